//! Reasoning-step construction for the query pipeline.
//!
//! Each builder mirrors one pipeline stage and carries the stage's summary
//! numbers in the step's string details. Rendering these into prose is a
//! presentation concern outside this crate.

use engram_core::text::preview;
use engram_core::types::{ReasoningStep, ScoredResult, StepKind, ValidationResult};
use engram_core::FusionWeights;

fn fmt(value: f32) -> String {
    format!("{value:.4}")
}

pub(crate) fn vector_search_step(results: &[ScoredResult]) -> ReasoningStep {
    let top = &results[..results.len().min(3)];
    let avg_similarity = top.iter().map(|r| r.score).sum::<f32>() / top.len().max(1) as f32;
    let top_results = top
        .iter()
        .map(|r| preview(&r.content, 50))
        .collect::<Vec<_>>()
        .join("; ");

    ReasoningStep::new(
        StepKind::VectorSearch,
        "Vector similarity search",
        avg_similarity,
    )
    .with_detail("num_results", results.len().to_string())
    .with_detail("avg_similarity", fmt(avg_similarity))
    .with_detail("top_results", top_results)
}

pub(crate) fn episodic_step(
    results: &[ScoredResult],
    queries: &[String],
    zero_filled: usize,
) -> ReasoningStep {
    let top = &results[..results.len().min(2)];
    let avg_relevance = top.iter().map(|r| r.score).sum::<f32>() / top.len().max(1) as f32;
    let relevant_context = queries
        .iter()
        .take(2)
        .map(|q| preview(q, 40))
        .collect::<Vec<_>>()
        .join("; ");

    let mut step = ReasoningStep::new(
        StepKind::EpisodicRetrieval,
        "Retrieved conversation context",
        avg_relevance,
    )
    .with_detail("num_episodes", results.len().to_string())
    .with_detail("avg_relevance", fmt(avg_relevance))
    .with_detail("relevant_context", relevant_context);
    if zero_filled > 0 {
        // Episodes reloaded from a legacy file carry no real embeddings.
        step = step.with_detail("zero_filled_embeddings", zero_filled.to_string());
    }
    step
}

pub(crate) fn semantic_step(results: &[ScoredResult]) -> ReasoningStep {
    let max_activation = results.first().map(|r| r.score).unwrap_or(0.0);
    let activated_concepts = results
        .iter()
        .take(5)
        .map(|r| r.content.clone())
        .collect::<Vec<_>>()
        .join(", ");

    ReasoningStep::new(
        StepKind::SemanticActivation,
        "Semantic concept spreading",
        max_activation,
    )
    .with_detail("num_concepts", results.len().to_string())
    .with_detail("activation_level", fmt(max_activation))
    .with_detail("activated_concepts", activated_concepts)
}

pub(crate) fn fusion_step(weights: FusionWeights, final_score: f32) -> ReasoningStep {
    ReasoningStep::new(
        StepKind::HybridFusion,
        "Combined evidence from multiple sources",
        final_score,
    )
    .with_detail("vector_weight", fmt(weights.vector))
    .with_detail("episodic_weight", fmt(weights.episodic))
    .with_detail("semantic_weight", fmt(weights.semantic))
    .with_detail("final_score", fmt(final_score))
}

pub(crate) fn hallucination_step(result: &ValidationResult) -> ReasoningStep {
    let passed = !result.is_hallucination;
    let confidence = if passed {
        result.confidence_score
    } else {
        1.0 - result.confidence_score
    };
    let mut step = ReasoningStep::new(
        StepKind::HallucinationCheck,
        if passed {
            "Response validated"
        } else {
            "Response flagged for review"
        },
        confidence,
    )
    .with_detail("passed", passed.to_string())
    .with_detail("confidence", fmt(result.confidence_score));
    if !result.flags.is_empty() {
        step = step.with_detail("flags", result.flags.join("; "));
    }
    step
}

pub(crate) fn error_step(stage: &'static str, kind: &'static str) -> ReasoningStep {
    ReasoningStep::new(StepKind::Error, "Query failed", 0.0)
        .with_detail("stage", stage)
        .with_detail("kind", kind)
}
