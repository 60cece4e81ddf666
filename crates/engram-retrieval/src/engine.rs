//! The cognitive query engine: owns all five components and drives the
//! query state machine.
//!
//! Pipeline order is fixed: vector search → episodic retrieval → semantic
//! activation → fusion → validation. Disabled stages are skipped, fusion
//! always runs, and each stage contributes at most one reasoning step. A
//! component failure aborts the pipeline without touching episodic or
//! semantic state; the caller gets the steps completed so far plus a
//! terminal error step.

use std::collections::HashMap;

use tracing::{info, warn};

use engram_core::config::{EngramConfig, QueryConfig};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::types::{
    overall_confidence, BatchIndexOutcome, Evidence, QueryResponse, ReasoningStep, ScoredResult,
    SourceKind,
};
use engram_episodic::EpisodicBuffer;
use engram_index::VectorIndex;
use engram_semantic::ConceptNetwork;
use engram_validation::ValidationEngine;

use crate::concepts::extract_concepts;
use crate::fusion::HybridFusion;
use crate::trace;

/// Sentinel response when fusion produces nothing.
pub const NO_RESULTS: &str = "No results found.";

/// Process-local orchestrator over the five memory components.
///
/// Reentrant across threads: every component synchronizes behind its own
/// exclusive lock, and the engine itself holds no mutable state.
pub struct CognitiveEngine {
    index: VectorIndex,
    episodic: EpisodicBuffer,
    semantic: ConceptNetwork,
    fusion: HybridFusion,
    validator: ValidationEngine,
}

impl CognitiveEngine {
    /// Build all components from one configuration. They live and die
    /// together with the engine.
    pub fn new(config: EngramConfig) -> EngramResult<Self> {
        Ok(Self {
            index: VectorIndex::new(config.index)?,
            episodic: EpisodicBuffer::new(config.episodic_capacity),
            semantic: ConceptNetwork::new(),
            fusion: HybridFusion::new(config.fusion),
            validator: ValidationEngine::new(config.validation),
        })
    }

    pub fn with_defaults() -> EngramResult<Self> {
        Self::new(EngramConfig::default())
    }

    /// Run the full pipeline. Never fails at the surface: a component
    /// error produces the sentinel response with a terminal error step.
    pub fn process_query(
        &self,
        query: &str,
        query_embedding: &[f32],
        config: &QueryConfig,
    ) -> QueryResponse {
        let mut steps: Vec<ReasoningStep> = Vec::new();
        match self.run_stages(query, query_embedding, config, &mut steps) {
            Ok(response) => {
                info!(
                    query,
                    results = response.results.len(),
                    confidence = response.confidence,
                    trace_confidence = overall_confidence(&response.reasoning),
                    "query processed"
                );
                response
            }
            Err(e) => {
                let (stage, kind) = match &e {
                    EngramError::QueryProcessing { stage, source } => (*stage, source.kind()),
                    other => ("query", other.kind()),
                };
                warn!(query, stage, kind, "query failed");
                steps.push(trace::error_step(stage, kind));
                QueryResponse {
                    query: query.to_string(),
                    response_text: NO_RESULTS.to_string(),
                    results: Vec::new(),
                    confidence: 0.0,
                    validation: None,
                    reasoning: std::mem::take(&mut steps),
                }
            }
        }
    }

    fn run_stages(
        &self,
        query: &str,
        query_embedding: &[f32],
        config: &QueryConfig,
        steps: &mut Vec<ReasoningStep>,
    ) -> EngramResult<QueryResponse> {
        // Vector search. The only stage that can fail a well-formed query
        // (dimension mismatch); it runs before any state is touched.
        let hits = self
            .index
            .search(query_embedding, config.top_k_results)
            .map_err(|e| EngramError::QueryProcessing {
                stage: "vector_search",
                source: Box::new(e),
            })?;
        let vector_results: Vec<ScoredResult> = hits
            .into_iter()
            .map(|h| ScoredResult::new(h.content, h.similarity, SourceKind::Vector))
            .collect();
        if !vector_results.is_empty() {
            steps.push(trace::vector_search_step(&vector_results));
        }

        // Episodic retrieval.
        let mut episodic_results: Vec<ScoredResult> = Vec::new();
        if config.use_episodic && !self.episodic.is_empty() {
            let scored = self.episodic.retrieve_similar(
                query_embedding,
                config.episodic_top_k,
                config.episodic_threshold,
            );
            if !scored.is_empty() {
                let queries: Vec<String> =
                    scored.iter().map(|s| s.episode.query.clone()).collect();
                let zero_filled = scored
                    .iter()
                    .filter(|s| s.episode.embedding_zero_filled)
                    .count();
                episodic_results = scored
                    .iter()
                    .map(|s| {
                        ScoredResult::new(
                            format!(
                                "Previous context: Q: {} A: {}",
                                s.episode.query, s.episode.response
                            ),
                            s.score,
                            SourceKind::Episodic,
                        )
                    })
                    .collect();
                steps.push(trace::episodic_step(&episodic_results, &queries, zero_filled));
            }
        }

        // Semantic activation seeded from the query's concept tokens.
        let mut semantic_results: Vec<ScoredResult> = Vec::new();
        if config.use_semantic && self.semantic.node_count() > 0 {
            let seeds = extract_concepts(query);
            let activated = self.semantic.spread_activation(
                &seeds,
                config.activation_max_hops,
                config.activation_decay,
                config.activation_threshold,
            );
            semantic_results = activated
                .into_iter()
                .map(|(name, activation)| {
                    ScoredResult::new(name, activation, SourceKind::Semantic)
                })
                .collect();
            if !semantic_results.is_empty() {
                steps.push(trace::semantic_step(&semantic_results));
            }
        }

        // Fusion runs unconditionally.
        let fused = self.fusion.fuse(
            &vector_results,
            &episodic_results,
            &semantic_results,
            config.top_k_results,
        );
        let (response_text, confidence) = match fused.first() {
            Some(top) => {
                steps.push(trace::fusion_step(self.fusion.weights(), top.score));
                (top.content.clone(), top.score)
            }
            None => (NO_RESULTS.to_string(), 0.0),
        };

        // Validation over the raw streams as evidence.
        let mut validation = None;
        if config.check_hallucination && !response_text.is_empty() {
            let evidence: Vec<Evidence> = vector_results
                .iter()
                .map(|r| Evidence::new(SourceKind::Vector, r.score, r.content.clone()))
                .chain(
                    episodic_results
                        .iter()
                        .map(|r| Evidence::new(SourceKind::Episodic, r.score, r.content.clone())),
                )
                .chain(
                    semantic_results
                        .iter()
                        .map(|r| Evidence::new(SourceKind::Semantic, r.score, r.content.clone())),
                )
                .collect();
            let outcome = self.validator.validate(
                query,
                &response_text,
                &evidence,
                config.hallucination_threshold,
            );
            steps.push(trace::hallucination_step(&outcome));
            validation = Some(outcome);
        }

        Ok(QueryResponse {
            query: query.to_string(),
            response_text,
            results: fused,
            confidence,
            validation,
            reasoning: std::mem::take(steps),
        })
    }

    /// Record a completed interaction, post-response.
    pub fn add_episode(
        &self,
        query: &str,
        response: &str,
        query_embedding: Vec<f32>,
        metadata: HashMap<String, String>,
    ) {
        self.episodic.add(query, response, query_embedding, metadata);
    }

    /// Index one document. `Ok(false)` means the id already existed.
    pub fn index_document(
        &self,
        doc_id: &str,
        embedding: &[f32],
        content: &str,
        metadata: serde_json::Value,
    ) -> EngramResult<bool> {
        self.index.add(doc_id, embedding, content, metadata)
    }

    /// Index a batch of `(doc_id, embedding, content)` triples.
    ///
    /// Failures do not abort the batch; the outcome reports how many
    /// documents landed, how many were duplicate-skipped, and the first
    /// error encountered.
    pub fn batch_index_documents(
        &self,
        documents: &[(String, Vec<f32>, String)],
    ) -> BatchIndexOutcome {
        let mut outcome = BatchIndexOutcome {
            indexed: 0,
            skipped: 0,
            first_error: None,
        };
        for (doc_id, embedding, content) in documents {
            match self
                .index
                .add(doc_id, embedding, content, serde_json::Value::Null)
            {
                Ok(true) => outcome.indexed += 1,
                Ok(false) => outcome.skipped += 1,
                Err(e) => {
                    warn!(doc_id, error = %e, "batch index entry failed");
                    if outcome.first_error.is_none() {
                        outcome.first_error = Some(e);
                    }
                }
            }
        }
        info!(
            indexed = outcome.indexed,
            skipped = outcome.skipped,
            failed = outcome.first_error.is_some(),
            "batch index complete"
        );
        outcome
    }

    /// Seed the concept graph with domain knowledge. Concepts with an
    /// empty embedding vector are stored without one.
    pub fn populate_semantic_network(
        &self,
        concepts: &[(String, Vec<f32>)],
        relations: &[(String, String, f32)],
    ) {
        for (name, embedding) in concepts {
            let embedding = (!embedding.is_empty()).then(|| embedding.clone());
            self.semantic.add_node(name, embedding);
        }
        for (source, target, weight) in relations {
            self.semantic.add_edge(source, target, *weight);
        }
    }

    // Component access for direct use (persistence, tuning, statistics).

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn episodic(&self) -> &EpisodicBuffer {
        &self.episodic
    }

    pub fn semantic(&self) -> &ConceptNetwork {
        &self.semantic
    }

    pub fn fusion(&self) -> &HybridFusion {
        &self.fusion
    }

    pub fn validator(&self) -> &ValidationEngine {
        &self.validator
    }
}
