use engram_core::config::{IndexConfig, SpaceKind};
use engram_index::VectorIndex;
use proptest::prelude::*;

fn test_index(dim: usize, capacity: usize) -> VectorIndex {
    VectorIndex::new(IndexConfig {
        dim,
        max_elements: capacity,
        m: 8,
        ef_construction: 64,
        ef_search: 64,
        space: SpaceKind::InnerProduct,
    })
    .unwrap()
}

fn arb_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    // Components bounded away from zero-norm degeneracy.
    prop::collection::vec(-1.0f32..1.0, dim).prop_filter("non-zero norm", |v| {
        v.iter().map(|x| x * x).sum::<f32>().sqrt() > 1e-3
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // ── Every inserted vector is its own nearest neighbor ────────────────

    #[test]
    fn self_retrieval(vectors in prop::collection::vec(arb_vector(8), 1..40)) {
        let index = test_index(8, 64);
        for (i, v) in vectors.iter().enumerate() {
            index.add(&format!("doc{i}"), v, "content", serde_json::Value::Null).unwrap();
        }
        for (i, v) in vectors.iter().enumerate() {
            let hits = index.search(v, 3).unwrap();
            prop_assert!(!hits.is_empty());
            // A duplicate direction may outrank doc i, but something with
            // similarity >= 0.99 must come back for its own embedding.
            prop_assert!(
                hits[0].similarity >= 0.99,
                "query {} got top similarity {}",
                i,
                hits[0].similarity
            );
        }
    }

    // ── Size accounting under arbitrary add/remove sequences ─────────────

    #[test]
    fn size_accounting(ops in prop::collection::vec((0u8..2, 0usize..16), 1..64)) {
        let index = test_index(4, 256);
        let mut live = std::collections::HashSet::new();
        let mut inserted = std::collections::HashSet::new();
        for (op, slot) in ops {
            let doc_id = format!("doc{slot}");
            if op == 0 {
                if !inserted.contains(&doc_id) {
                    let v = vec![slot as f32 + 1.0, 1.0, 0.0, 0.0];
                    if index.add(&doc_id, &v, "c", serde_json::Value::Null).unwrap() {
                        inserted.insert(doc_id.clone());
                        live.insert(doc_id);
                    }
                }
            } else if index.remove(&doc_id) {
                live.remove(&doc_id);
            }
        }
        prop_assert_eq!(index.len(), live.len());
        for doc_id in &live {
            prop_assert!(index.has_document(doc_id));
        }
    }

    // ── Search never resurfaces a removed document ───────────────────────

    #[test]
    fn tombstones_stay_buried(
        vectors in prop::collection::vec(arb_vector(4), 2..24),
        remove_first in any::<bool>(),
    ) {
        let index = test_index(4, 64);
        for (i, v) in vectors.iter().enumerate() {
            index.add(&format!("doc{i}"), v, "c", serde_json::Value::Null).unwrap();
        }
        let victim = if remove_first { 0 } else { vectors.len() - 1 };
        index.remove(&format!("doc{victim}"));

        let hits = index.search(&vectors[victim], vectors.len()).unwrap();
        let victim_doc_id = format!("doc{}", victim);
        prop_assert!(hits.iter().all(|h| h.doc_id != victim_doc_id));
    }
}
