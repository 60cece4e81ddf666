use serde::{Deserialize, Serialize};

use super::SourceKind;

/// One piece of evidence collected for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: SourceKind,
    pub confidence: f32,
    pub content: String,
}

impl Evidence {
    pub fn new(source: SourceKind, confidence: f32, content: impl Into<String>) -> Self {
        Self {
            source,
            confidence,
            content: content.into(),
        }
    }
}
