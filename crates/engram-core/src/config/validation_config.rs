use serde::{Deserialize, Serialize};

use super::defaults;

/// Hallucination validator thresholds and phrase lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum number of strong evidence items before the
    /// `insufficient_evidence` flag is raised.
    pub min_evidence_count: usize,
    /// Evidence below this confidence does not count as strong.
    pub min_evidence_confidence: f32,
    /// Case-insensitive substrings that mark a response as hedging.
    pub hedge_phrases: Vec<String>,
    /// Phrases that signal a factual claim; unsupported ones are flagged
    /// when no evidence was collected at all.
    pub factual_indicators: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_evidence_count: defaults::DEFAULT_MIN_EVIDENCE_COUNT,
            min_evidence_confidence: defaults::DEFAULT_MIN_EVIDENCE_CONFIDENCE,
            hedge_phrases: [
                "i think",
                "maybe",
                "possibly",
                "i'm not sure",
                "i believe",
                "it seems",
                "probably",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            factual_indicators: [
                "according to",
                "research shows",
                "studies indicate",
                "it is known that",
                "the fact is",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}
