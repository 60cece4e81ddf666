//! Stock tuning values, collected in one place.

/// Embedding dimension (OpenAI ada-002).
pub const DEFAULT_DIM: usize = 1536;
pub const DEFAULT_MAX_ELEMENTS: usize = 100_000;
/// HNSW connectivity parameter.
pub const DEFAULT_M: usize = 16;
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;
pub const DEFAULT_EF_SEARCH: usize = 50;

pub const DEFAULT_EPISODIC_CAPACITY: usize = 128;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_HALLUCINATION_THRESHOLD: f32 = 0.5;
pub const DEFAULT_EPISODIC_TOP_K: usize = 5;
pub const DEFAULT_EPISODIC_THRESHOLD: f32 = 0.6;
pub const DEFAULT_ACTIVATION_MAX_HOPS: usize = 3;
pub const DEFAULT_ACTIVATION_DECAY: f32 = 0.7;
pub const DEFAULT_ACTIVATION_THRESHOLD: f32 = 0.1;

pub const DEFAULT_MIN_EVIDENCE_COUNT: usize = 2;
pub const DEFAULT_MIN_EVIDENCE_CONFIDENCE: f32 = 0.6;
