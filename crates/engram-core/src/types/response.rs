use serde::{Deserialize, Serialize};

use crate::errors::EngramError;

use super::{ReasoningStep, ScoredResult, ValidationResult};

/// Full response to one processed query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    /// Content of the top fused result, or `"No results found."`.
    pub response_text: String,
    pub results: Vec<ScoredResult>,
    /// Top fused score; 0.0 when no results were produced.
    pub confidence: f32,
    /// Present only when hallucination checking ran.
    pub validation: Option<ValidationResult>,
    /// Steps in the fixed pipeline order, ending with an `error` step on
    /// failure.
    pub reasoning: Vec<ReasoningStep>,
}

/// Report from a batch indexing call: inserts stop at the first error, and
/// duplicates count as skipped rather than indexed.
#[derive(Debug)]
pub struct BatchIndexOutcome {
    /// Documents actually inserted.
    pub indexed: usize,
    /// Documents skipped because their `doc_id` already existed.
    pub skipped: usize,
    pub first_error: Option<EngramError>,
}
