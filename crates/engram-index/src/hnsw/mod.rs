//! Hand-built Hierarchical Navigable Small World proximity graph.
//!
//! Nodes are appended with a geometrically sampled level; per-level
//! neighbor lists are capped at `m` (`2m` at level 0) and maintained with
//! the diversity heuristic. Search descends greedily through the upper
//! levels, then runs an `ef`-bounded best-first expansion at level 0.
//!
//! The graph knows nothing about documents: it stores raw vectors under
//! dense `u64` ids and a tombstone set. Id assignment is append-only and
//! ids are never reused.

mod construction;
mod query;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use engram_core::constants::HNSW_RNG_SEED;
use engram_core::vecmath;

/// Per-level adjacency list; inline up to the default `2m`.
pub(crate) type NeighborList = SmallVec<[u64; 32]>;

/// Distance metric over stored vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Metric {
    /// Negated dot product; cosine over unit-normalized input.
    InnerProduct,
    /// Squared Euclidean distance.
    SquaredL2,
}

impl Metric {
    pub(crate) fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::InnerProduct => -vecmath::dot(a, b),
            Metric::SquaredL2 => vecmath::l2_squared(a, b),
        }
    }

    /// Map a raw distance into a descending [0, 1]-ish similarity.
    pub(crate) fn similarity(self, distance: f32) -> f32 {
        match self {
            Metric::InnerProduct => (-distance + 1.0) / 2.0,
            Metric::SquaredL2 => 1.0 / (1.0 + distance),
        }
    }
}

/// Heap entry ordered by distance, with the id as a deterministic tiebreak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DistNode {
    pub dist: f32,
    pub id: u64,
}

impl Eq for DistNode {}

impl Ord for DistNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for DistNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(HNSW_RNG_SEED)
}

/// The layered proximity graph.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HnswGraph {
    metric: Metric,
    m: usize,
    m_max0: usize,
    ef_construction: usize,
    /// `1 / ln(m)`, the geometric level-sampling multiplier.
    level_mult: f64,
    entry_point: Option<u64>,
    max_level: usize,
    vectors: Vec<Vec<f32>>,
    /// `links[id][level]` = neighbor ids of `id` at that level.
    links: Vec<Vec<NeighborList>>,
    /// Soft-deleted ids: still route searches, never surface as results.
    deleted: HashSet<u64>,
    /// Level sampling; reseeded (not persisted) across snapshot reloads.
    #[serde(skip, default = "seeded_rng")]
    rng: StdRng,
}

impl HnswGraph {
    pub(crate) fn new(metric: Metric, m: usize, ef_construction: usize, capacity: usize) -> Self {
        let m = m.max(2);
        Self {
            metric,
            m,
            m_max0: m * 2,
            ef_construction: ef_construction.max(m),
            level_mult: 1.0 / (m as f64).ln(),
            entry_point: None,
            max_level: 0,
            vectors: Vec::with_capacity(capacity),
            links: Vec::with_capacity(capacity),
            deleted: HashSet::new(),
            rng: seeded_rng(),
        }
    }

    pub(crate) fn metric(&self) -> Metric {
        self.metric
    }

    /// Total nodes ever inserted, tombstones included.
    pub(crate) fn len(&self) -> usize {
        self.vectors.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub(crate) fn mark_deleted(&mut self, id: u64) {
        if (id as usize) < self.vectors.len() {
            self.deleted.insert(id);
        }
    }

    fn level_cap(&self, level: usize) -> usize {
        if level == 0 {
            self.m_max0
        } else {
            self.m
        }
    }
}
