//! The concept graph: petgraph storage plus a name index, behind one
//! exclusive lock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use engram_core::errors::{EngramResult, SemanticError};
use engram_core::vecmath;

use crate::activation;

/// One concept. `activation` is advisory cached state refreshed by the
/// last spread; correctness never depends on it.
#[derive(Debug, Clone)]
pub struct ConceptNode {
    pub name: String,
    pub embedding: Option<Vec<f32>>,
    pub activation: f32,
}

pub(crate) struct GraphState {
    pub(crate) graph: DiGraph<ConceptNode, f32>,
    pub(crate) names: HashMap<String, NodeIndex>,
}

impl GraphState {
    /// Look up or auto-create a node (empty embedding on auto-create).
    fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&ix) = self.names.get(name) {
            return ix;
        }
        let ix = self.graph.add_node(ConceptNode {
            name: name.to_string(),
            embedding: None,
            activation: 0.0,
        });
        self.names.insert(name.to_string(), ix);
        ix
    }
}

/// Directed weighted concept graph with spreading activation.
///
/// Cycles are permitted; activation terminates on the hop bound and the
/// threshold cutoff regardless. Edge weights are clamped into `[0, 1]` so
/// a single spread can never push activation above the source level.
pub struct ConceptNetwork {
    state: Mutex<GraphState>,
}

impl Default for ConceptNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl ConceptNetwork {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState {
                graph: DiGraph::new(),
                names: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GraphState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Idempotent: an existing node is left unchanged (its embedding is
    /// not overwritten).
    pub fn add_node(&self, name: &str, embedding: Option<Vec<f32>>) {
        let mut state = self.lock();
        if state.names.contains_key(name) {
            return;
        }
        let ix = state.graph.add_node(ConceptNode {
            name: name.to_string(),
            embedding,
            activation: 0.0,
        });
        state.names.insert(name.to_string(), ix);
    }

    /// Insert or overwrite a directed edge. Missing endpoints are
    /// auto-created; the weight is clamped into `[0, 1]`.
    pub fn add_edge(&self, source: &str, target: &str, weight: f32) {
        let mut state = self.lock();
        let s = state.ensure_node(source);
        let t = state.ensure_node(target);
        let weight = weight.clamp(0.0, 1.0);
        if let Some(edge) = state.graph.find_edge(s, t) {
            state.graph[edge] = weight;
        } else {
            state.graph.add_edge(s, t, weight);
        }
    }

    /// BFS spread from the source set with initial activation 1.0.
    ///
    /// Absent sources are skipped silently. The result contains every
    /// activated node (sources included), sorted by activation descending
    /// with name as the deterministic tiebreak.
    pub fn spread_activation(
        &self,
        sources: &[String],
        max_hops: usize,
        decay: f32,
        threshold: f32,
    ) -> Vec<(String, f32)> {
        let mut state = self.lock();
        let activated = activation::spread(&mut state, sources, max_hops, decay, threshold);
        debug!(
            sources = sources.len(),
            max_hops,
            activated = activated.len(),
            "activation spread"
        );
        activated
    }

    /// Concepts whose embeddings score `>= threshold` cosine similarity
    /// against the query, best first; nodes without embeddings are skipped.
    pub fn find_similar_concepts(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> EngramResult<Vec<String>> {
        let state = self.lock();
        let mut scored: Vec<(String, f32)> = Vec::new();
        for ix in state.graph.node_indices() {
            let node = &state.graph[ix];
            let Some(embedding) = &node.embedding else {
                continue;
            };
            if embedding.len() != query_embedding.len() {
                return Err(SemanticError::DimensionMismatch {
                    expected: query_embedding.len(),
                    actual: embedding.len(),
                }
                .into());
            }
            let similarity = vecmath::cosine_similarity(query_embedding, embedding);
            if similarity >= threshold {
                scored.push((node.name.clone(), similarity));
            }
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);
        Ok(scored.into_iter().map(|(name, _)| name).collect())
    }

    /// Zero every cached activation level.
    pub fn reset_activations(&self) {
        let mut state = self.lock();
        for node in state.graph.node_weights_mut() {
            node.activation = 0.0;
        }
    }

    /// Multiply every cached activation by `rate` (for long-running use).
    pub fn decay_activations(&self, rate: f32) {
        let mut state = self.lock();
        for node in state.graph.node_weights_mut() {
            node.activation *= rate;
        }
    }

    pub fn node_count(&self) -> usize {
        self.lock().graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.lock().graph.edge_count()
    }

    pub fn get_node(&self, name: &str) -> Option<ConceptNode> {
        let state = self.lock();
        let ix = state.names.get(name)?;
        Some(state.graph[*ix].clone())
    }
}
