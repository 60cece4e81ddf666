//! The validation engine.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use engram_core::config::ValidationConfig;
use engram_core::constants::FLAG_PENALTY;
use engram_core::text;
use engram_core::types::{Evidence, ValidationResult};

/// Stable flag tags carried in [`ValidationResult::flags`].
pub const FLAG_INSUFFICIENT_EVIDENCE: &str = "insufficient_evidence";
pub const FLAG_HEDGING: &str = "hedging";
pub const FLAG_UNSUBSTANTIATED_CLAIMS: &str = "unsubstantiated_claims";

/// Validates responses against collected evidence.
///
/// Stateless per call; the lock only guards runtime extensions to the
/// hedge-phrase set.
pub struct ValidationEngine {
    config: Mutex<ValidationConfig>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl ValidationEngine {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ValidationConfig> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Extend the hedge-phrase set at runtime.
    pub fn add_hedge_phrase(&self, phrase: &str) {
        self.lock().hedge_phrases.push(phrase.to_lowercase());
    }

    /// Score `response` against `evidence`.
    ///
    /// A response is a hallucination when its final confidence — evidence
    /// support minus a fixed penalty per raised flag, clamped to [0, 1] —
    /// falls below `threshold`.
    pub fn validate(
        &self,
        _query: &str,
        response: &str,
        evidence: &[Evidence],
        threshold: f32,
    ) -> ValidationResult {
        let config = self.lock();

        let strong: Vec<&Evidence> = evidence
            .iter()
            .filter(|e| e.confidence >= config.min_evidence_confidence)
            .collect();

        let mut flags = Vec::new();
        if strong.len() < config.min_evidence_count {
            flags.push(FLAG_INSUFFICIENT_EVIDENCE.to_string());
        }
        if matches_any(response, &config.hedge_phrases) {
            flags.push(FLAG_HEDGING.to_string());
        }
        if evidence.is_empty() && matches_any(response, &config.factual_indicators) {
            flags.push(FLAG_UNSUBSTANTIATED_CLAIMS.to_string());
        }

        let support = evidence_support(response, &strong);
        let penalty = flags.len() as f32 * FLAG_PENALTY;
        let confidence_score = (support - penalty).clamp(0.0, 1.0);
        let is_hallucination = confidence_score < threshold;

        debug!(
            flags = flags.len(),
            support,
            confidence_score,
            is_hallucination,
            "response validated"
        );

        ValidationResult {
            is_hallucination,
            confidence_score,
            flags,
            supporting_evidence: evidence.to_vec(),
        }
    }
}

fn matches_any(response: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text::contains_ci(response, p))
}

/// Confidence-weighted lexical overlap between the response and the strong
/// evidence.
///
/// Content tokens are case-folded words longer than 3 characters. Each
/// evidence item weighs in with `|common| / |response_tokens|`; the result
/// is the overlap-weighted mean of evidence confidences. With no overlap
/// anywhere the mean confidence stands in; with no strong evidence at all
/// the support is 0.
fn evidence_support(response: &str, strong: &[&Evidence]) -> f32 {
    if strong.is_empty() {
        return 0.0;
    }
    let response_tokens = text::content_tokens(response);

    let mut total_score = 0.0f32;
    let mut total_weight = 0.0f32;
    for evidence in strong {
        let overlap = if response_tokens.is_empty() {
            0.0
        } else {
            let content = text::content_tokens(&evidence.content);
            let common = response_tokens.intersection(&content).count();
            common as f32 / response_tokens.len() as f32
        };
        total_score += evidence.confidence * overlap;
        total_weight += overlap;
    }

    if total_weight == 0.0 {
        let sum: f32 = strong.iter().map(|e| e.confidence).sum();
        return sum / strong.len() as f32;
    }
    total_score / total_weight
}
