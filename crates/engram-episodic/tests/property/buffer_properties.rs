use std::collections::HashMap;

use engram_episodic::EpisodicBuffer;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ── Size never exceeds capacity, contents are the newest suffix ──────

    #[test]
    fn ring_bound_holds(capacity in 1usize..16, inserts in 1usize..64) {
        let buffer = EpisodicBuffer::new(capacity);
        for i in 0..inserts {
            buffer.add(&format!("q{i}"), "r", vec![1.0, 0.0], HashMap::new());
        }
        prop_assert_eq!(buffer.len(), inserts.min(capacity));

        let recent = buffer.get_recent(capacity);
        let expected: Vec<String> = (inserts.saturating_sub(capacity)..inserts)
            .map(|i| format!("q{i}"))
            .collect();
        let actual: Vec<String> = recent.iter().map(|e| e.query.clone()).collect();
        prop_assert_eq!(actual, expected);
    }

    // ── Retrieval scores are bounded and sorted ──────────────────────────

    #[test]
    fn retrieval_scores_descend(
        embeddings in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 3), 1..20),
    ) {
        let buffer = EpisodicBuffer::new(32);
        for (i, e) in embeddings.iter().enumerate() {
            buffer.add(&format!("q{i}"), "r", e.clone(), HashMap::new());
        }
        let hits = buffer.retrieve_similar(&[1.0, 0.0, 0.0], 10, 0.0);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for hit in &hits {
            prop_assert!(hit.score <= 1.0 + 1e-6);
        }
    }
}
