use engram_core::types::{FusionWeights, ScoredResult, SourceKind};
use engram_retrieval::HybridFusion;

fn result(content: &str, score: f32, source: SourceKind) -> ScoredResult {
    ScoredResult::new(content, score, source)
}

// ── Fusing ───────────────────────────────────────────────────────────────

#[test]
fn shared_content_fuses_across_sources() {
    let fusion = HybridFusion::new(FusionWeights::new(0.6, 0.2, 0.2));
    let fused = fusion.fuse(
        &[result("x", 0.9, SourceKind::Vector)],
        &[result("x", 0.8, SourceKind::Episodic)],
        &[],
        10,
    );

    assert_eq!(fused.len(), 1);
    assert_eq!(fused[0].content, "x");
    assert_eq!(fused[0].source, SourceKind::Fused);
    assert!((fused[0].score - 0.70).abs() < 1e-6);
    assert!((fused[0].source_score(SourceKind::Vector) - 0.9).abs() < 1e-6);
    assert!((fused[0].source_score(SourceKind::Episodic) - 0.8).abs() < 1e-6);
    assert_eq!(fused[0].source_score(SourceKind::Semantic), 0.0);
}

#[test]
fn missing_sources_contribute_zero() {
    let fusion = HybridFusion::new(FusionWeights::new(0.5, 0.25, 0.25));
    let fused = fusion.fuse(&[result("only", 0.8, SourceKind::Vector)], &[], &[], 10);
    assert!((fused[0].score - 0.4).abs() < 1e-6);
}

#[test]
fn output_is_sorted_and_truncated() {
    let fusion = HybridFusion::default();
    let vector: Vec<ScoredResult> = (0..6)
        .map(|i| result(&format!("doc{i}"), i as f32 / 10.0, SourceKind::Vector))
        .collect();
    let fused = fusion.fuse(&vector, &[], &[], 3);

    assert_eq!(fused.len(), 3);
    assert_eq!(fused[0].content, "doc5");
    for pair in fused.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn duplicate_content_within_a_source_keeps_the_maximum() {
    let fusion = HybridFusion::new(FusionWeights::new(1.0, 0.0, 0.0));
    let fused = fusion.fuse(
        &[
            result("dup", 0.3, SourceKind::Vector),
            result("dup", 0.8, SourceKind::Vector),
        ],
        &[],
        &[],
        10,
    );
    assert_eq!(fused.len(), 1);
    assert!((fused[0].score - 0.8).abs() < 1e-6);
}

#[test]
fn ties_order_deterministically_by_content() {
    let fusion = HybridFusion::default();
    let semantic = vec![
        result("zebra", 0.5, SourceKind::Semantic),
        result("apple", 0.5, SourceKind::Semantic),
    ];
    let fused = fusion.fuse(&[], &[], &semantic, 10);
    assert_eq!(fused[0].content, "apple");
    assert_eq!(fused[1].content, "zebra");
}

#[test]
fn fusing_nothing_yields_nothing() {
    let fusion = HybridFusion::default();
    assert!(fusion.fuse(&[], &[], &[], 10).is_empty());
}

// ── Weight management ────────────────────────────────────────────────────

#[test]
fn weights_normalize_on_assignment() {
    let fusion = HybridFusion::default();
    fusion.set_weights(FusionWeights::new(3.0, 1.0, 1.0));
    let w = fusion.weights();
    assert!((w.sum() - 1.0).abs() < 1e-6);
    assert!((w.vector - 0.6).abs() < 1e-6);
}

#[test]
fn degenerate_weights_fall_back_to_equal() {
    let fusion = HybridFusion::default();
    fusion.set_weights(FusionWeights::new(-1.0, -2.0, 0.0));
    let w = fusion.weights();
    assert!((w.vector - 1.0 / 3.0).abs() < 1e-6);
    assert!((w.sum() - 1.0).abs() < 1e-6);
}

// ── Learning ─────────────────────────────────────────────────────────────

fn fused_with_sources(v: f32, e: f32, s: f32) -> ScoredResult {
    let mut r = result("c", 0.0, SourceKind::Fused);
    r.source_scores.insert("vector".into(), v);
    r.source_scores.insert("episodic".into(), e);
    r.source_scores.insert("semantic".into(), s);
    r
}

#[test]
fn positive_feedback_boosts_the_correlated_source() {
    let fusion = HybridFusion::new(FusionWeights::equal());
    let before = fusion.weights();

    // Vector scores track feedback; the others are flat.
    let results = vec![
        fused_with_sources(0.9, 0.1, 0.1),
        fused_with_sources(0.8, 0.1, 0.1),
    ];
    fusion.learn_weights(&results, &[1.0, 1.0]);

    let after = fusion.weights();
    assert!(after.vector > before.vector);
    assert!((after.sum() - 1.0).abs() < 1e-6);
}

#[test]
fn negative_feedback_cannot_push_weights_below_zero() {
    let fusion = HybridFusion::new(FusionWeights::new(0.01, 0.495, 0.495));
    let results = vec![fused_with_sources(1.0, 0.0, 0.0)];
    fusion.learn_weights(&results, &[-100.0]);

    let w = fusion.weights();
    assert!(w.vector >= 0.0);
    assert!((w.sum() - 1.0).abs() < 1e-6);
}

#[test]
fn mismatched_feedback_is_ignored() {
    let fusion = HybridFusion::default();
    let before = fusion.weights();
    fusion.learn_weights(&[fused_with_sources(1.0, 0.0, 0.0)], &[1.0, 0.5]);
    fusion.learn_weights(&[], &[]);
    assert_eq!(fusion.weights(), before);
}
