//! Concurrency stress: the index lock must serialize interleaved writers
//! and searchers without losing accounting.

use std::sync::Arc;
use std::thread;

use engram_core::config::{IndexConfig, SpaceKind};
use engram_index::VectorIndex;

fn shared_index(capacity: usize) -> Arc<VectorIndex> {
    Arc::new(
        VectorIndex::new(IndexConfig {
            max_elements: capacity,
            m: 8,
            ef_construction: 32,
            ef_search: 32,
            space: SpaceKind::InnerProduct,
            ..IndexConfig::with_dim(4)
        })
        .unwrap(),
    )
}

fn vector_for(i: usize) -> Vec<f32> {
    let a = (i as f32 * 0.37).sin();
    let b = (i as f32 * 0.61).cos();
    vec![a, b, 1.0, i as f32 * 0.01]
}

#[test]
fn concurrent_writers_keep_ids_unique() {
    let index = shared_index(1024);
    let writers = 4;
    let per_writer = 64;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for i in 0..per_writer {
                    let doc_id = format!("w{w}-d{i}");
                    index
                        .add(&doc_id, &vector_for(w * per_writer + i), "content", serde_json::Value::Null)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(index.len(), writers * per_writer);

    // internal_id assignment is totally ordered by the lock: all distinct,
    // all below the number of inserts.
    let mut ids: Vec<u64> = (0..writers)
        .flat_map(|w| {
            (0..per_writer).map(move |i| format!("w{w}-d{i}"))
        })
        .map(|doc_id| index.get(&doc_id).unwrap().internal_id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), writers * per_writer);
    assert_eq!(*ids.last().unwrap(), (writers * per_writer - 1) as u64);
}

#[test]
fn searches_interleave_with_writes() {
    let index = shared_index(1024);
    for i in 0..32 {
        index
            .add(&format!("seed{i}"), &vector_for(i), "seed", serde_json::Value::Null)
            .unwrap();
    }

    let writer = {
        let index = Arc::clone(&index);
        thread::spawn(move || {
            for i in 32..96 {
                index
                    .add(&format!("live{i}"), &vector_for(i), "live", serde_json::Value::Null)
                    .unwrap();
            }
        })
    };
    let searchers: Vec<_> = (0..3)
        .map(|s| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                for i in 0..64 {
                    let hits = index.search(&vector_for(s * 64 + i), 5).unwrap();
                    // Never torn: results are complete, ranked, and finite.
                    assert!(hits.len() <= 5);
                    assert!(!hits.is_empty());
                    for pair in hits.windows(2) {
                        assert!(pair[0].similarity >= pair[1].similarity);
                    }
                    for hit in &hits {
                        assert!(hit.similarity.is_finite());
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for searcher in searchers {
        searcher.join().unwrap();
    }
    assert_eq!(index.len(), 96);
}

#[test]
fn removers_and_writers_settle_consistently() {
    let index = shared_index(1024);
    for i in 0..128 {
        index
            .add(&format!("doc{i}"), &vector_for(i), "c", serde_json::Value::Null)
            .unwrap();
    }

    let remover = {
        let index = Arc::clone(&index);
        thread::spawn(move || {
            for i in (0..128).step_by(2) {
                assert!(index.remove(&format!("doc{i}")));
            }
        })
    };
    let writer = {
        let index = Arc::clone(&index);
        thread::spawn(move || {
            for i in 128..160 {
                index
                    .add(&format!("doc{i}"), &vector_for(i), "c", serde_json::Value::Null)
                    .unwrap();
            }
        })
    };
    remover.join().unwrap();
    writer.join().unwrap();

    assert_eq!(index.len(), 128 - 64 + 32);
    let stats = index.statistics();
    assert_eq!(stats.current_elements, 160);
}
