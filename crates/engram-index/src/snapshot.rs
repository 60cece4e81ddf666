//! Snapshot persistence: binary graph + JSON sidecar.
//!
//! `<path>` holds the bincode-serialized HNSW graph; `<path>.meta` is a
//! UTF-8 JSON object describing the configuration and the document
//! registry. A snapshot is valid only as the pair: either file missing or
//! unreadable fails the load.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use engram_core::config::{IndexConfig, SpaceKind};
use engram_core::errors::{EngramResult, IndexError};
use engram_core::types::DocumentRecord;

use crate::hnsw::HnswGraph;
use crate::index::{metric_for, IndexState};

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotMeta {
    dim: usize,
    max_elements: usize,
    #[serde(rename = "M")]
    m: usize,
    ef_construction: usize,
    ef_search: usize,
    /// `"ip"` or `"l2"`.
    space_type: String,
    next_internal_id: u64,
    documents: Vec<DocumentRecord>,
}

fn meta_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".meta");
    PathBuf::from(os)
}

fn persistence_err(path: &Path, reason: impl Into<String>) -> IndexError {
    IndexError::Persistence {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Write the pair in order: binary first, then sidecar. A crash between
/// the two leaves a pair the loader rejects.
pub(crate) fn write(state: &IndexState, path: &Path) -> EngramResult<()> {
    let binary = File::create(path).map_err(|e| persistence_err(path, e.to_string()))?;
    bincode::serialize_into(BufWriter::new(binary), &state.graph)
        .map_err(|e| persistence_err(path, e.to_string()))?;

    let meta = SnapshotMeta {
        dim: state.config.dim,
        max_elements: state.config.max_elements,
        m: state.config.m,
        ef_construction: state.config.ef_construction,
        ef_search: state.config.ef_search,
        space_type: state.config.space.as_str().to_string(),
        next_internal_id: state.next_internal_id,
        documents: state.documents.values().cloned().collect(),
    };
    let sidecar = meta_path(path);
    let meta_file = File::create(&sidecar).map_err(|e| persistence_err(&sidecar, e.to_string()))?;
    serde_json::to_writer_pretty(BufWriter::new(meta_file), &meta)
        .map_err(|e| persistence_err(&sidecar, e.to_string()))?;
    Ok(())
}

/// Read and validate a snapshot pair into a fresh index state.
///
/// The sidecar is read first: it must exist, parse, and declare the
/// expected dimension before the binary is touched.
pub(crate) fn read(expected_dim: usize, path: &Path) -> EngramResult<IndexState> {
    let sidecar = meta_path(path);
    let meta_file = File::open(&sidecar).map_err(|e| persistence_err(&sidecar, e.to_string()))?;
    let meta: SnapshotMeta = serde_json::from_reader(BufReader::new(meta_file))
        .map_err(|e| persistence_err(&sidecar, format!("invalid sidecar: {e}")))?;

    if meta.dim != expected_dim {
        return Err(IndexError::DimensionMismatch {
            expected: expected_dim,
            actual: meta.dim,
        }
        .into());
    }
    let space = match meta.space_type.as_str() {
        "ip" => SpaceKind::InnerProduct,
        "l2" => SpaceKind::L2,
        other => {
            return Err(persistence_err(&sidecar, format!("unknown space type {other:?}")).into())
        }
    };

    let binary = File::open(path).map_err(|e| persistence_err(path, e.to_string()))?;
    let graph: HnswGraph = bincode::deserialize_from(BufReader::new(binary))
        .map_err(|e| persistence_err(path, format!("corrupt graph: {e}")))?;

    if graph.len() as u64 != meta.next_internal_id {
        return Err(persistence_err(path, "graph and sidecar disagree on element count").into());
    }
    if graph.metric() != metric_for(space) {
        return Err(persistence_err(path, "graph and sidecar disagree on space type").into());
    }

    let config = IndexConfig {
        dim: meta.dim,
        max_elements: meta.max_elements,
        m: meta.m,
        ef_construction: meta.ef_construction,
        ef_search: meta.ef_search,
        space,
    };

    let mut documents = std::collections::HashMap::new();
    let mut id_to_doc = std::collections::HashMap::new();
    for doc in meta.documents {
        if doc.internal_id >= meta.next_internal_id {
            return Err(
                persistence_err(&sidecar, format!("document {:?} has an out-of-range internal id", doc.doc_id)).into(),
            );
        }
        id_to_doc.insert(doc.internal_id, doc.doc_id.clone());
        documents.insert(doc.doc_id.clone(), doc);
    }

    Ok(IndexState {
        config,
        graph,
        documents,
        id_to_doc,
        next_internal_id: meta.next_internal_id,
    })
}
