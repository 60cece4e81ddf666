use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// One past (query, response) interaction and its query embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub query: String,
    pub response: String,
    pub embedding: Vec<f32>,
    /// Captured at insertion.
    pub timestamp_ms: u64,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Set when the episode was reloaded from a legacy snapshot that did
    /// not carry embeddings; retrieval surfaces this as a trace warning.
    #[serde(default)]
    pub embedding_zero_filled: bool,
}

impl Episode {
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        embedding: Vec<f32>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            embedding,
            timestamp_ms: now_ms(),
            metadata,
            embedding_zero_filled: false,
        }
    }
}

/// An episode paired with its similarity×decay retrieval score.
#[derive(Debug, Clone)]
pub struct ScoredEpisode {
    pub episode: Episode,
    pub score: f32,
}
