//! Weighted-sum fusion of per-source scores with content-keyed dedup.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use engram_core::constants::FUSION_LEARNING_RATE;
use engram_core::types::{FusionWeights, ScoredResult, SourceKind};

#[derive(Default, Clone, Copy)]
struct SourceScores {
    vector: f32,
    episodic: f32,
    semantic: f32,
}

/// Combines the three evidence streams into one ranking.
///
/// Stateless per fuse call; the lock guards weight updates only.
pub struct HybridFusion {
    weights: Mutex<FusionWeights>,
}

impl Default for HybridFusion {
    fn default() -> Self {
        Self::new(FusionWeights::default())
    }
}

impl HybridFusion {
    pub fn new(weights: FusionWeights) -> Self {
        Self {
            weights: Mutex::new(weights.normalized()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FusionWeights> {
        self.weights.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn weights(&self) -> FusionWeights {
        *self.lock()
    }

    /// Replace the weights; normalized on assignment, degenerate input
    /// falls back to equal weights.
    pub fn set_weights(&self, weights: FusionWeights) {
        let normalized = weights.normalized();
        if weights.sum() <= 0.0 {
            warn!("degenerate fusion weights, falling back to equal");
        }
        *self.lock() = normalized;
    }

    /// Fuse the three streams into at most `top_k` results, deduplicated
    /// by content.
    ///
    /// Duplicate content within one stream keeps that stream's maximum
    /// score. The output sorts by fused score descending with a fixed
    /// tiebreak chain (vector, then episodic, then content) so equal-score
    /// orderings are deterministic.
    pub fn fuse(
        &self,
        vector_results: &[ScoredResult],
        episodic_results: &[ScoredResult],
        semantic_results: &[ScoredResult],
        top_k: usize,
    ) -> Vec<ScoredResult> {
        let weights = *self.lock();

        let mut by_content: HashMap<&str, SourceScores> = HashMap::new();
        for result in vector_results {
            let entry = by_content.entry(&result.content).or_default();
            entry.vector = entry.vector.max(result.score);
        }
        for result in episodic_results {
            let entry = by_content.entry(&result.content).or_default();
            entry.episodic = entry.episodic.max(result.score);
        }
        for result in semantic_results {
            let entry = by_content.entry(&result.content).or_default();
            entry.semantic = entry.semantic.max(result.score);
        }

        let mut fused: Vec<ScoredResult> = by_content
            .into_iter()
            .map(|(content, scores)| {
                let score = weights.vector * scores.vector
                    + weights.episodic * scores.episodic
                    + weights.semantic * scores.semantic;
                let mut result = ScoredResult::new(content, score, SourceKind::Fused);
                result
                    .source_scores
                    .insert(SourceKind::Vector.as_str().to_string(), scores.vector);
                result
                    .source_scores
                    .insert(SourceKind::Episodic.as_str().to_string(), scores.episodic);
                result
                    .source_scores
                    .insert(SourceKind::Semantic.as_str().to_string(), scores.semantic);
                result
            })
            .collect();

        fused.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| {
                    b.source_score(SourceKind::Vector)
                        .total_cmp(&a.source_score(SourceKind::Vector))
                })
                .then_with(|| {
                    b.source_score(SourceKind::Episodic)
                        .total_cmp(&a.source_score(SourceKind::Episodic))
                })
                .then_with(|| a.content.cmp(&b.content))
        });
        fused.truncate(top_k);

        debug!(
            vector = vector_results.len(),
            episodic = episodic_results.len(),
            semantic = semantic_results.len(),
            fused = fused.len(),
            "streams fused"
        );
        fused
    }

    /// One proportional weight-update step from relevance feedback.
    ///
    /// Accumulates a per-source correlation (`Σ score·feedback / n`,
    /// uncentered) and nudges each weight by the learning rate before
    /// renormalizing. Mismatched or empty feedback is a logged no-op.
    pub fn learn_weights(&self, results: &[ScoredResult], feedback: &[f32]) {
        if results.is_empty() || results.len() != feedback.len() {
            warn!(
                results = results.len(),
                feedback = feedback.len(),
                "feedback shape mismatch, skipping weight update"
            );
            return;
        }

        let n = results.len() as f32;
        let mut corr = SourceScores::default();
        for (result, &f) in results.iter().zip(feedback.iter()) {
            corr.vector += result.source_score(SourceKind::Vector) * f / n;
            corr.episodic += result.source_score(SourceKind::Episodic) * f / n;
            corr.semantic += result.source_score(SourceKind::Semantic) * f / n;
        }

        let mut weights = self.lock();
        let updated = FusionWeights::new(
            weights.vector + FUSION_LEARNING_RATE * corr.vector,
            weights.episodic + FUSION_LEARNING_RATE * corr.episodic,
            weights.semantic + FUSION_LEARNING_RATE * corr.semantic,
        );
        *weights = updated.normalized();
        debug!(
            vector = weights.vector,
            episodic = weights.episodic,
            semantic = weights.semantic,
            "fusion weights updated"
        );
    }
}
