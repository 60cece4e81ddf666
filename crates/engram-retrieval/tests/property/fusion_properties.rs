use engram_core::types::{FusionWeights, ScoredResult, SourceKind};
use engram_retrieval::HybridFusion;
use proptest::prelude::*;

fn arb_stream(source: SourceKind) -> impl Strategy<Value = Vec<ScoredResult>> {
    prop::collection::vec((0u8..8, 0.0f32..1.0), 0..12).prop_map(move |items| {
        items
            .into_iter()
            .map(|(slot, score)| ScoredResult::new(format!("content{slot}"), score, source))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ── Every output score reconstructs from its per-source scores ───────

    #[test]
    fn fused_scores_reconstruct(
        vector in arb_stream(SourceKind::Vector),
        episodic in arb_stream(SourceKind::Episodic),
        semantic in arb_stream(SourceKind::Semantic),
        wv in 0.0f32..2.0,
        we in 0.0f32..2.0,
        ws in 0.0f32..2.0,
    ) {
        let fusion = HybridFusion::new(FusionWeights::new(wv, we, ws));
        let w = fusion.weights();
        prop_assert!((w.sum() - 1.0).abs() < 1e-6);

        let fused = fusion.fuse(&vector, &episodic, &semantic, 16);
        for result in &fused {
            let expected = w.vector * result.source_score(SourceKind::Vector)
                + w.episodic * result.source_score(SourceKind::Episodic)
                + w.semantic * result.source_score(SourceKind::Semantic);
            prop_assert!((result.score - expected).abs() < 1e-6);
        }
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    // ── Learning keeps weights a valid distribution ──────────────────────

    #[test]
    fn learned_weights_stay_normalized(
        feedback_rounds in prop::collection::vec(
            prop::collection::vec((-2.0f32..2.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0), 1..6),
            1..5,
        ),
    ) {
        let fusion = HybridFusion::default();
        for round in feedback_rounds {
            let results: Vec<ScoredResult> = round
                .iter()
                .map(|(_, v, e, s)| {
                    let mut r = ScoredResult::new("c", 0.0, SourceKind::Fused);
                    r.source_scores.insert("vector".into(), *v);
                    r.source_scores.insert("episodic".into(), *e);
                    r.source_scores.insert("semantic".into(), *s);
                    r
                })
                .collect();
            let feedback: Vec<f32> = round.iter().map(|(f, ..)| *f).collect();
            fusion.learn_weights(&results, &feedback);

            let w = fusion.weights();
            prop_assert!((w.sum() - 1.0).abs() < 1e-6);
            prop_assert!(w.vector >= 0.0 && w.episodic >= 0.0 && w.semantic >= 0.0);
        }
    }
}
