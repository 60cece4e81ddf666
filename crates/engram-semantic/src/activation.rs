//! Spreading activation: bounded-hop BFS with per-edge decay.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::network::GraphState;

/// Spread from `sources` (initial activation 1.0) and return every
/// activated node sorted by activation descending, names lexicographic on
/// ties. Refreshes the advisory activation cache on the nodes.
pub(crate) fn spread(
    state: &mut GraphState,
    sources: &[String],
    max_hops: usize,
    decay: f32,
    threshold: f32,
) -> Vec<(String, f32)> {
    let mut activations: HashMap<NodeIndex, f32> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    // (node, hops from its source, activation on arrival)
    let mut frontier: VecDeque<(NodeIndex, usize, f32)> = VecDeque::new();

    for name in sources {
        // Unknown sources are skipped silently.
        let Some(&ix) = state.names.get(name) else {
            continue;
        };
        if visited.insert(ix) {
            activations.insert(ix, 1.0);
            frontier.push_back((ix, 0, 1.0));
        }
    }

    while let Some((node, hops, activation)) = frontier.pop_front() {
        if hops >= max_hops {
            continue;
        }
        for edge in state.graph.edges(node) {
            let neighbor = edge.target();
            if neighbor == node {
                // Self-loops contribute nothing.
                continue;
            }
            let spread = (activation * decay * *edge.weight()).min(1.0);
            if spread < threshold {
                continue;
            }
            activations
                .entry(neighbor)
                .and_modify(|a| *a = a.max(spread))
                .or_insert(spread);
            // Each node enters the frontier once, at its first-seen level.
            if visited.insert(neighbor) {
                frontier.push_back((neighbor, hops + 1, spread));
            }
        }
    }

    // Refresh the cached per-node levels: previous spread state is cleared.
    for node in state.graph.node_weights_mut() {
        node.activation = 0.0;
    }
    for (&ix, &level) in &activations {
        state.graph[ix].activation = level;
    }

    let mut out: Vec<(String, f32)> = activations
        .iter()
        .map(|(&ix, &level)| (state.graph[ix].name.clone(), level))
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    out
}
