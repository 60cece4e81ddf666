use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-query pipeline configuration.
///
/// Disabling a stage skips its state (and its reasoning step); fusion
/// always runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub use_episodic: bool,
    pub use_semantic: bool,
    pub check_hallucination: bool,
    /// Result cap applied to both vector search and the fused output.
    pub top_k_results: usize,
    /// Validation confidence below this marks the response a hallucination.
    pub hallucination_threshold: f32,
    pub episodic_top_k: usize,
    pub episodic_threshold: f32,
    pub activation_max_hops: usize,
    pub activation_decay: f32,
    pub activation_threshold: f32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            use_episodic: true,
            use_semantic: true,
            check_hallucination: true,
            top_k_results: defaults::DEFAULT_TOP_K,
            hallucination_threshold: defaults::DEFAULT_HALLUCINATION_THRESHOLD,
            episodic_top_k: defaults::DEFAULT_EPISODIC_TOP_K,
            episodic_threshold: defaults::DEFAULT_EPISODIC_THRESHOLD,
            activation_max_hops: defaults::DEFAULT_ACTIVATION_MAX_HOPS,
            activation_decay: defaults::DEFAULT_ACTIVATION_DECAY,
            activation_threshold: defaults::DEFAULT_ACTIVATION_THRESHOLD,
        }
    }
}
