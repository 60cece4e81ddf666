//! The document-facing vector index: HNSW graph + document registry under
//! one exclusive lock.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use engram_core::config::{IndexConfig, SpaceKind};
use engram_core::errors::{EngramResult, IndexError};
use engram_core::types::DocumentRecord;
use engram_core::vecmath;

use crate::hnsw::{HnswGraph, Metric};
use crate::snapshot;

/// One raw index hit, before conversion into the fusion data model.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub doc_id: String,
    pub content: String,
    pub similarity: f32,
    pub metadata: serde_json::Value,
}

/// Point-in-time index counters and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatistics {
    /// Live documents (tombstones excluded).
    pub total_documents: usize,
    pub dimension: usize,
    pub max_elements: usize,
    /// Internal ids ever assigned (tombstones included).
    pub current_elements: usize,
    pub m: usize,
    pub ef_construction: usize,
    pub ef_search: usize,
    /// Rough estimate only.
    pub memory_usage_mb: f64,
}

pub(crate) struct IndexState {
    pub(crate) config: IndexConfig,
    pub(crate) graph: HnswGraph,
    pub(crate) documents: HashMap<String, DocumentRecord>,
    pub(crate) id_to_doc: HashMap<u64, String>,
    pub(crate) next_internal_id: u64,
}

impl IndexState {
    pub(crate) fn empty(config: IndexConfig) -> Self {
        let graph = HnswGraph::new(
            metric_for(config.space),
            config.m,
            config.ef_construction,
            config.max_elements,
        );
        Self {
            config,
            graph,
            documents: HashMap::new(),
            id_to_doc: HashMap::new(),
            next_internal_id: 0,
        }
    }
}

pub(crate) fn metric_for(space: SpaceKind) -> Metric {
    match space {
        SpaceKind::InnerProduct => Metric::InnerProduct,
        SpaceKind::L2 => Metric::SquaredL2,
    }
}

/// ANN index over unit-normalized embeddings with per-document metadata.
///
/// One exclusive lock covers every operation: the underlying graph is not
/// safe for interleaved reads and writes, so search takes the same lock as
/// insert.
pub struct VectorIndex {
    state: Mutex<IndexState>,
}

impl VectorIndex {
    pub fn new(config: IndexConfig) -> EngramResult<Self> {
        if config.dim == 0 {
            return Err(IndexError::InvalidConfig {
                reason: "dimension must be greater than 0".into(),
            }
            .into());
        }
        if config.max_elements == 0 {
            return Err(IndexError::InvalidConfig {
                reason: "max_elements must be greater than 0".into(),
            }
            .into());
        }
        Ok(Self {
            state: Mutex::new(IndexState::empty(config)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, IndexState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a document. Returns `Ok(false)` if `doc_id` is already
    /// present (the index is unchanged).
    pub fn add(
        &self,
        doc_id: &str,
        embedding: &[f32],
        content: &str,
        metadata: serde_json::Value,
    ) -> EngramResult<bool> {
        let mut state = self.lock();
        if state.documents.contains_key(doc_id) {
            debug!(doc_id, "duplicate document id, skipping insert");
            return Ok(false);
        }
        if embedding.len() != state.config.dim {
            return Err(IndexError::DimensionMismatch {
                expected: state.config.dim,
                actual: embedding.len(),
            }
            .into());
        }
        if state.next_internal_id >= state.config.max_elements as u64 {
            return Err(IndexError::CapacityExceeded {
                max_elements: state.config.max_elements,
            }
            .into());
        }

        let vector = if state.config.space == SpaceKind::InnerProduct {
            vecmath::normalized(embedding)
        } else {
            embedding.to_vec()
        };

        let internal_id = state.graph.insert(vector);
        state.documents.insert(
            doc_id.to_string(),
            DocumentRecord {
                doc_id: doc_id.to_string(),
                content: content.to_string(),
                metadata,
                internal_id,
            },
        );
        state.id_to_doc.insert(internal_id, doc_id.to_string());
        state.next_internal_id = internal_id + 1;

        debug!(doc_id, internal_id, "document indexed");
        Ok(true)
    }

    /// Nearest documents by descending similarity; at most `k`, empty when
    /// the index is empty.
    pub fn search(&self, query: &[f32], k: usize) -> EngramResult<Vec<SearchHit>> {
        let state = self.lock();
        if query.len() != state.config.dim {
            return Err(IndexError::DimensionMismatch {
                expected: state.config.dim,
                actual: query.len(),
            }
            .into());
        }
        if state.graph.is_empty() {
            return Ok(Vec::new());
        }

        let normalized;
        let query = if state.config.space == SpaceKind::InnerProduct {
            normalized = vecmath::normalized(query);
            normalized.as_slice()
        } else {
            query
        };

        let metric = state.graph.metric();
        let hits = state.graph.search(query, k, state.config.ef_search);
        let results: Vec<SearchHit> = hits
            .into_iter()
            .filter_map(|node| {
                let doc_id = state.id_to_doc.get(&node.id)?;
                let doc = state.documents.get(doc_id)?;
                Some(SearchHit {
                    doc_id: doc.doc_id.clone(),
                    content: doc.content.clone(),
                    similarity: metric.similarity(node.dist),
                    metadata: doc.metadata.clone(),
                })
            })
            .collect();

        debug!(k, found = results.len(), "vector search complete");
        Ok(results)
    }

    /// Soft-delete: the mapping is dropped and the graph node tombstoned.
    pub fn remove(&self, doc_id: &str) -> bool {
        let mut state = self.lock();
        let Some(record) = state.documents.remove(doc_id) else {
            return false;
        };
        state.id_to_doc.remove(&record.internal_id);
        state.graph.mark_deleted(record.internal_id);
        debug!(doc_id, internal_id = record.internal_id, "document removed");
        true
    }

    pub fn has_document(&self, doc_id: &str) -> bool {
        self.lock().documents.contains_key(doc_id)
    }

    pub fn get(&self, doc_id: &str) -> Option<DocumentRecord> {
        self.lock().documents.get(doc_id).cloned()
    }

    /// Live document count.
    pub fn len(&self) -> usize {
        self.lock().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim(&self) -> usize {
        self.lock().config.dim
    }

    pub fn set_ef_search(&self, ef: usize) {
        self.lock().config.ef_search = ef.max(1);
    }

    pub fn ef_search(&self) -> usize {
        self.lock().config.ef_search
    }

    pub fn statistics(&self) -> IndexStatistics {
        let state = self.lock();
        let n = state.next_internal_id as usize;
        let memory_usage_mb = if n > 0 {
            let log_n = (n as f64).log2().max(1.0);
            let graph_bytes = n as f64
                * state.config.m as f64
                * 2.0
                * log_n
                * state.config.dim as f64
                * std::mem::size_of::<f32>() as f64;
            let metadata_bytes = state.documents.len() as f64 * 1024.0;
            (graph_bytes + metadata_bytes) / (1024.0 * 1024.0)
        } else {
            0.0
        };
        IndexStatistics {
            total_documents: state.documents.len(),
            dimension: state.config.dim,
            max_elements: state.config.max_elements,
            current_elements: n,
            m: state.config.m,
            ef_construction: state.config.ef_construction,
            ef_search: state.config.ef_search,
            memory_usage_mb,
        }
    }

    /// Drop everything and reinitialize with the current configuration.
    pub fn clear(&self) {
        let mut state = self.lock();
        *state = IndexState::empty(state.config.clone());
        info!("index cleared");
    }

    /// Write the snapshot pair: binary graph at `path`, JSON sidecar at
    /// `<path>.meta`. Best-effort; the caller supplies an existing
    /// directory.
    pub fn save(&self, path: &Path) -> EngramResult<()> {
        let state = self.lock();
        snapshot::write(&state, path)?;
        info!(
            path = %path.display(),
            documents = state.documents.len(),
            "index snapshot saved"
        );
        Ok(())
    }

    /// Replace the index contents from a snapshot pair.
    ///
    /// Any failure (missing or unparseable sidecar, dimension mismatch,
    /// missing or corrupt binary) leaves the index empty and initialized
    /// with its original configuration.
    pub fn load(&self, path: &Path) -> EngramResult<()> {
        let mut state = self.lock();
        let expected_dim = state.config.dim;
        match snapshot::read(expected_dim, path) {
            Ok(loaded) => {
                let documents = loaded.documents.len();
                *state = loaded;
                info!(path = %path.display(), documents, "index snapshot loaded");
                Ok(())
            }
            Err(e) => {
                *state = IndexState::empty(state.config.clone());
                warn!(path = %path.display(), error = %e, "snapshot load failed, index reset");
                Err(e)
            }
        }
    }
}
