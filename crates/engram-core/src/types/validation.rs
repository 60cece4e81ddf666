use serde::{Deserialize, Serialize};

use super::Evidence;

/// Outcome of validating a response against collected evidence.
///
/// This is a value, never an error: a flagged response still flows back to
/// the caller with its flags attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_hallucination: bool,
    /// 0.0 = certain hallucination, 1.0 = fully supported.
    pub confidence_score: f32,
    /// Stable snake_case tags, e.g. `hedging`.
    pub flags: Vec<String>,
    pub supporting_evidence: Vec<Evidence>,
}
