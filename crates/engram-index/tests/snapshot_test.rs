use std::fs;

use engram_core::config::{IndexConfig, SpaceKind};
use engram_index::VectorIndex;
use tempfile::TempDir;

fn config(dim: usize) -> IndexConfig {
    IndexConfig {
        dim,
        max_elements: 64,
        m: 8,
        ef_construction: 32,
        ef_search: 16,
        space: SpaceKind::InnerProduct,
    }
}

fn populated_index() -> VectorIndex {
    let index = VectorIndex::new(config(4)).unwrap();
    index
        .add("a", &[1.0, 0.0, 0.0, 0.0], "alpha", serde_json::json!({"n": 1}))
        .unwrap();
    index
        .add("b", &[0.0, 1.0, 0.0, 0.0], "beta", serde_json::Value::Null)
        .unwrap();
    index
        .add("c", &[0.0, 0.0, 1.0, 0.0], "gamma", serde_json::Value::Null)
        .unwrap();
    index.remove("b");
    index
}

#[test]
fn save_load_round_trip_preserves_search() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    let queries: Vec<Vec<f32>> = vec![
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
        vec![0.5, 0.5, 0.5, 0.0],
    ];
    let before: Vec<Vec<(String, f32)>> = queries
        .iter()
        .map(|q| {
            index
                .search(q, 5)
                .unwrap()
                .into_iter()
                .map(|h| (h.doc_id, h.similarity))
                .collect()
        })
        .collect();

    index.save(&path).unwrap();

    let restored = VectorIndex::new(config(4)).unwrap();
    restored.load(&path).unwrap();
    assert_eq!(restored.len(), 2);
    assert!(!restored.has_document("b"));
    assert_eq!(restored.get("a").unwrap().metadata, serde_json::json!({"n": 1}));

    for (q, expected) in queries.iter().zip(before.iter()) {
        let after: Vec<(String, f32)> = restored
            .search(q, 5)
            .unwrap()
            .into_iter()
            .map(|h| (h.doc_id, h.similarity))
            .collect();
        assert_eq!(
            after.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            expected.iter().map(|(id, _)| id).collect::<Vec<_>>()
        );
        for ((_, sim_a), (_, sim_b)) in after.iter().zip(expected.iter()) {
            assert!((sim_a - sim_b).abs() < 1e-5);
        }
    }
}

#[test]
fn loaded_index_accepts_further_inserts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    index.save(&path).unwrap();

    let restored = VectorIndex::new(config(4)).unwrap();
    restored.load(&path).unwrap();
    assert!(restored
        .add("d", &[0.0, 0.0, 0.0, 1.0], "delta", serde_json::Value::Null)
        .unwrap());
    let hits = restored.search(&[0.0, 0.0, 0.0, 1.0], 1).unwrap();
    assert_eq!(hits[0].doc_id, "d");
    // Internal ids continue past the tombstoned one.
    assert_eq!(restored.get("d").unwrap().internal_id, 3);
}

#[test]
fn missing_sidecar_fails_and_resets() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    index.save(&path).unwrap();
    fs::remove_file(dir.path().join("index.bin.meta")).unwrap();

    let restored = VectorIndex::new(config(4)).unwrap();
    restored
        .add("seed", &[1.0, 0.0, 0.0, 0.0], "seed", serde_json::Value::Null)
        .unwrap();
    assert!(restored.load(&path).is_err());
    // Failed load leaves the index empty, not half-populated.
    assert!(restored.is_empty());
    assert!(restored
        .add("x", &[1.0, 0.0, 0.0, 0.0], "x", serde_json::Value::Null)
        .unwrap());
}

#[test]
fn missing_binary_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    index.save(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let restored = VectorIndex::new(config(4)).unwrap();
    assert!(restored.load(&path).is_err());
    assert!(restored.is_empty());
}

#[test]
fn corrupt_sidecar_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    index.save(&path).unwrap();
    fs::write(dir.path().join("index.bin.meta"), "not json {").unwrap();

    let restored = VectorIndex::new(config(4)).unwrap();
    let err = restored.load(&path).unwrap_err();
    assert_eq!(err.kind(), "persistence_error");
}

#[test]
fn dimension_mismatch_fails_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.bin");

    let index = populated_index();
    index.save(&path).unwrap();

    let restored = VectorIndex::new(config(8)).unwrap();
    let err = restored.load(&path).unwrap_err();
    assert_eq!(err.kind(), "dimension_mismatch");
    assert!(restored.is_empty());
}
