//! # engram-index
//!
//! Approximate-nearest-neighbor search over unit-normalized embeddings.
//! A hand-built HNSW proximity graph carries the geometry; a document
//! registry maps caller-assigned ids to graph nodes and holds content and
//! metadata; snapshots persist both as a binary + JSON sidecar pair.

pub(crate) mod hnsw;

mod index;
mod snapshot;

pub use index::{IndexStatistics, SearchHit, VectorIndex};
