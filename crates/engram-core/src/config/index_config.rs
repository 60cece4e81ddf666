use serde::{Deserialize, Serialize};

use super::defaults;

/// Distance space for the vector index.
///
/// Inner-product space over unit-normalized vectors yields cosine
/// similarity; L2 space keeps raw Euclidean geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceKind {
    #[serde(rename = "ip")]
    InnerProduct,
    #[serde(rename = "l2")]
    L2,
}

impl SpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceKind::InnerProduct => "ip",
            SpaceKind::L2 => "l2",
        }
    }
}

/// Vector index construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Embedding dimension; every stored or queried vector must match.
    pub dim: usize,
    /// Hard capacity; internal ids are never reused, so tombstones count.
    pub max_elements: usize,
    /// HNSW per-level neighbor cap (level 0 allows twice this).
    pub m: usize,
    /// Beam width during graph construction.
    pub ef_construction: usize,
    /// Beam width during search; tunable at runtime via `set_ef_search`.
    pub ef_search: usize,
    pub space: SpaceKind,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dim: defaults::DEFAULT_DIM,
            max_elements: defaults::DEFAULT_MAX_ELEMENTS,
            m: defaults::DEFAULT_M,
            ef_construction: defaults::DEFAULT_EF_CONSTRUCTION,
            ef_search: defaults::DEFAULT_EF_SEARCH,
            space: SpaceKind::InnerProduct,
        }
    }
}

impl IndexConfig {
    /// Convenience constructor for the common case.
    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }
}
