//! Graph search: greedy upper-level descent and bounded best-first
//! expansion.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use super::{DistNode, HnswGraph};

impl HnswGraph {
    /// Hill-climb to the locally closest node at one level.
    pub(super) fn greedy_closest(&self, query: &[f32], start: u64, level: usize) -> u64 {
        let mut cur = start;
        let mut cur_dist = self.metric.distance(query, &self.vectors[cur as usize]);
        loop {
            let mut improved = false;
            for &n in &self.links[cur as usize][level] {
                let d = self.metric.distance(query, &self.vectors[n as usize]);
                if d < cur_dist {
                    cur = n;
                    cur_dist = d;
                    improved = true;
                }
            }
            if !improved {
                return cur;
            }
        }
    }

    /// Best-first expansion keeping the `ef` closest visited nodes.
    /// Returns them sorted by ascending distance.
    pub(super) fn search_layer(
        &self,
        query: &[f32],
        entries: &[u64],
        ef: usize,
        level: usize,
    ) -> Vec<DistNode> {
        let ef = ef.max(1);
        let mut visited: HashSet<u64> = HashSet::new();
        // Min-heap of nodes still to expand, max-heap of the best ef found.
        let mut frontier: BinaryHeap<Reverse<DistNode>> = BinaryHeap::new();
        let mut best: BinaryHeap<DistNode> = BinaryHeap::new();

        for &e in entries {
            if visited.insert(e) {
                let d = self.metric.distance(query, &self.vectors[e as usize]);
                frontier.push(Reverse(DistNode { dist: d, id: e }));
                best.push(DistNode { dist: d, id: e });
                if best.len() > ef {
                    best.pop();
                }
            }
        }

        while let Some(Reverse(c)) = frontier.pop() {
            if let Some(worst) = best.peek() {
                if best.len() >= ef && c.dist > worst.dist {
                    break;
                }
            }
            for &n in &self.links[c.id as usize][level] {
                if !visited.insert(n) {
                    continue;
                }
                let d = self.metric.distance(query, &self.vectors[n as usize]);
                let worst = best.peek().map(|w| w.dist).unwrap_or(f32::INFINITY);
                if best.len() < ef || d < worst {
                    frontier.push(Reverse(DistNode { dist: d, id: n }));
                    best.push(DistNode { dist: d, id: n });
                    if best.len() > ef {
                        best.pop();
                    }
                }
            }
        }

        let mut out = best.into_vec();
        out.sort_unstable();
        out
    }

    /// Nearest live nodes to `query`, ascending by distance, at most `k`.
    /// Tombstoned nodes participate in routing but are filtered from the
    /// result set.
    pub(crate) fn search(&self, query: &[f32], k: usize, ef_search: usize) -> Vec<DistNode> {
        let Some(mut cur) = self.entry_point else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }
        for lev in (1..=self.max_level).rev() {
            cur = self.greedy_closest(query, cur, lev);
        }
        let mut out = self.search_layer(query, &[cur], ef_search.max(k), 0);
        out.retain(|c| !self.deleted.contains(&c.id));
        out.truncate(k);
        out
    }
}
