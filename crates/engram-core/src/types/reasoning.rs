use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Pipeline stage a reasoning step describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    VectorSearch,
    EpisodicRetrieval,
    SemanticActivation,
    HybridFusion,
    HallucinationCheck,
    /// Terminal step of a failed query; `details["kind"]` names the error.
    Error,
}

/// One entry in a query's reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub kind: StepKind,
    pub description: String,
    #[serde(default)]
    pub details: HashMap<String, String>,
    pub confidence: f32,
}

impl ReasoningStep {
    pub fn new(kind: StepKind, description: impl Into<String>, confidence: f32) -> Self {
        Self {
            kind,
            description: description.into(),
            details: HashMap::new(),
            confidence,
        }
    }

    /// Builder-style detail insertion.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Mean step confidence; 0.0 for an empty trace.
pub fn overall_confidence(steps: &[ReasoningStep]) -> f32 {
    if steps.is_empty() {
        return 0.0;
    }
    steps.iter().map(|s| s.confidence).sum::<f32>() / steps.len() as f32
}
