//! System-wide constants shared across the workspace.

/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vectors with an L2 norm below this are left unnormalized.
pub const MIN_NORM: f32 = 1e-10;

/// Temporal decay rate per millisecond for episodic retrieval scoring.
pub const EPISODIC_DECAY_LAMBDA: f32 = 1e-6;

/// Learning rate for fusion weight updates from feedback.
pub const FUSION_LEARNING_RATE: f32 = 0.1;

/// Confidence penalty applied per validation flag.
pub const FLAG_PENALTY: f32 = 0.2;

/// Tokens must be strictly longer than this to count as content words.
pub const MIN_CONTENT_TOKEN_LEN: usize = 3;

/// RNG seed for HNSW level sampling (the hnswlib default), kept fixed so
/// index construction and snapshots are reproducible.
pub const HNSW_RNG_SEED: u64 = 100;
