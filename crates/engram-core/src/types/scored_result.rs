use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which memory produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Vector,
    Episodic,
    Semantic,
    Fused,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Vector => "vector",
            SourceKind::Episodic => "episodic",
            SourceKind::Semantic => "semantic",
            SourceKind::Fused => "fused",
        }
    }
}

/// One scored piece of content crossing the fusion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub content: String,
    pub score: f32,
    pub source: SourceKind,
    /// Per-source raw scores, keyed by [`SourceKind::as_str`]. Populated by
    /// fusion; empty on single-source results.
    #[serde(default)]
    pub source_scores: HashMap<String, f32>,
}

impl ScoredResult {
    pub fn new(content: impl Into<String>, score: f32, source: SourceKind) -> Self {
        Self {
            content: content.into(),
            score,
            source,
            source_scores: HashMap::new(),
        }
    }

    /// Raw score this result carried from a given source (0.0 if absent).
    pub fn source_score(&self, source: SourceKind) -> f32 {
        self.source_scores
            .get(source.as_str())
            .copied()
            .unwrap_or(0.0)
    }
}
