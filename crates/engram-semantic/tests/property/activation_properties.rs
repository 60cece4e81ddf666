use std::collections::HashMap;

use engram_semantic::ConceptNetwork;
use proptest::prelude::*;

fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8, f32)>> {
    prop::collection::vec((0u8..12, 0u8..12, 0.0f32..1.0), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ── Activation is bounded by decay^depth and by 1.0 ──────────────────

    #[test]
    fn activation_bounded_by_decay_power(
        edges in arb_edges(),
        decay in 0.1f32..1.0,
        max_hops in 1usize..5,
    ) {
        let network = ConceptNetwork::new();
        for (s, t, w) in &edges {
            network.add_edge(&format!("n{s}"), &format!("n{t}"), *w);
        }
        let source = "n0".to_string();
        let activated = network.spread_activation(&[source.clone()], max_hops, decay, 0.0);

        // BFS depth from the source over the same adjacency.
        let mut adjacency: HashMap<u8, Vec<u8>> = HashMap::new();
        for (s, t, _) in &edges {
            adjacency.entry(*s).or_default().push(*t);
        }
        let mut depth: HashMap<u8, usize> = HashMap::new();
        depth.insert(0, 0);
        let mut queue = std::collections::VecDeque::from([0u8]);
        while let Some(n) = queue.pop_front() {
            let d = depth[&n];
            for &next in adjacency.get(&n).map(|v| v.as_slice()).unwrap_or(&[]) {
                if next != n && !depth.contains_key(&next) {
                    depth.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        for (name, activation) in &activated {
            prop_assert!(*activation >= 0.0);
            prop_assert!(*activation <= 1.0 + 1e-6);
            let id: u8 = name[1..].parse().unwrap();
            if let Some(&hops) = depth.get(&id) {
                let bound = decay.powi(hops as i32);
                prop_assert!(
                    *activation <= bound + 1e-5,
                    "{name} at depth {hops}: {activation} > {bound}"
                );
            }
        }
    }

    // ── Output is sorted and duplicate-free ──────────────────────────────

    #[test]
    fn output_is_sorted_and_unique(edges in arb_edges()) {
        let network = ConceptNetwork::new();
        for (s, t, w) in &edges {
            network.add_edge(&format!("n{s}"), &format!("n{t}"), *w);
        }
        let activated = network.spread_activation(&["n0".to_string()], 3, 0.7, 0.05);

        for pair in activated.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
        let mut names: Vec<&String> = activated.iter().map(|(n, _)| n).collect();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), activated.len());
    }
}
