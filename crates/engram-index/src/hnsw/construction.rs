//! Graph construction: level sampling, insertion, and neighbor pruning.

use rand::Rng;

use super::{DistNode, HnswGraph, NeighborList};

impl HnswGraph {
    /// Geometric level sample: `floor(-ln(U) / ln(m))`.
    fn random_level(&mut self) -> usize {
        let r: f64 = self.rng.gen::<f64>().max(f64::MIN_POSITIVE);
        (-r.ln() * self.level_mult) as usize
    }

    /// Append a vector and wire it into the graph. Returns its dense id.
    ///
    /// The caller has already validated dimension and capacity.
    pub(crate) fn insert(&mut self, vector: Vec<f32>) -> u64 {
        let id = self.vectors.len() as u64;
        let level = self.random_level();
        self.vectors.push(vector);
        self.links.push(vec![NeighborList::new(); level + 1]);

        let Some(entry) = self.entry_point else {
            // First node becomes the entry point at its sampled level.
            self.entry_point = Some(id);
            self.max_level = level;
            return id;
        };

        let query = self.vectors[id as usize].clone();

        // Greedy descent through the levels above the new node's level.
        let mut cur = entry;
        if level < self.max_level {
            for lev in (level + 1..=self.max_level).rev() {
                cur = self.greedy_closest(&query, cur, lev);
            }
        }

        // Beam search + heuristic selection at each shared level.
        let mut entries: Vec<u64> = vec![cur];
        for lev in (0..=level.min(self.max_level)).rev() {
            let candidates = self.search_layer(&query, &entries, self.ef_construction, lev);
            let selected = self.select_neighbors(&candidates, self.m);

            let cap = self.level_cap(lev);
            for &neighbor in &selected {
                self.links[neighbor as usize][lev].push(id);
                if self.links[neighbor as usize][lev].len() > cap {
                    self.prune_neighbors(neighbor, lev, cap);
                }
            }
            self.links[id as usize][lev] = selected;
            entries = candidates.iter().map(|c| c.id).collect();
        }

        if level > self.max_level {
            self.max_level = level;
            self.entry_point = Some(id);
        }
        id
    }

    /// Diversity heuristic: walk candidates by increasing distance (each
    /// carries its distance to the query) and keep one only if it is closer
    /// to the query than to every neighbor already selected. Spreads the
    /// list across directions instead of clustering on the nearest few.
    fn select_neighbors(&self, candidates: &[DistNode], m: usize) -> NeighborList {
        let mut selected = NeighborList::new();
        for c in candidates {
            if selected.len() >= m {
                break;
            }
            let cv = &self.vectors[c.id as usize];
            let diverse = selected
                .iter()
                .all(|&s| self.metric.distance(cv, &self.vectors[s as usize]) >= c.dist);
            if diverse {
                selected.push(c.id);
            }
        }
        selected
    }

    /// Re-select a node's neighbor list after it grew past `cap`.
    fn prune_neighbors(&mut self, node: u64, level: usize, cap: usize) {
        let base = self.vectors[node as usize].clone();
        let mut candidates: Vec<DistNode> = self.links[node as usize][level]
            .iter()
            .map(|&id| DistNode {
                dist: self.metric.distance(&base, &self.vectors[id as usize]),
                id,
            })
            .collect();
        candidates.sort_unstable();
        self.links[node as usize][level] = self.select_neighbors(&candidates, cap);
    }
}
