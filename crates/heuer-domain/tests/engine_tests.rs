//! End-to-end engine tests over snapshots

use heuer_domain::{
    compute_diagnosticity, compute_likelihood, render_matrix, sort_by_diagnosticity,
    AnalysisSession, AnalysisSnapshot, ConfidenceLevel, EngineError, EvidenceRef, Hypothesis,
    HypothesisEngine, LikelihoodPolicy, OrphanKind, ScaleType,
};

fn hypotheses(n: u32) -> Vec<Hypothesis> {
    (0..n)
        .map(|i| Hypothesis::new(format!("H{}", i + 1), format!("hypothesis {}", i + 1), i))
        .collect()
}

#[test]
fn test_two_by_two_tie() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(2))
        .with_evidence("E1")
        .with_evidence("E2")
        .with_score("H1", "E1", 3)
        .with_score("H1", "E2", -1)
        .with_score("H2", "E1", -2)
        .with_score("H2", "E2", 4);

    let diag = compute_diagnosticity(&snapshot).unwrap().value;
    assert_eq!(diag.len(), 2);
    assert_eq!(diag[0].evidence_id.as_str(), "E1");
    assert_eq!(diag[0].score, 50);
    assert_eq!(diag[1].score, 50);

    let likelihood = compute_likelihood(&snapshot).unwrap().value;
    let order: Vec<&str> = likelihood.results.iter().map(|r| r.hypothesis_id.as_str()).collect();
    assert_eq!(order, vec!["H1", "H2"]);
    assert_eq!(likelihood.results[0].weighted_score, 2);
    assert_eq!(likelihood.results[1].weighted_score, 2);
    assert!((likelihood.results[0].likelihood_percent - 50.0).abs() < 1e-9);
    assert!((likelihood.results[1].likelihood_percent - 50.0).abs() < 1e-9);
    assert_eq!(likelihood.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_repeated_calls_are_identical() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Linear, hypotheses(3))
        .with_evidence("E1")
        .with_evidence("E2")
        .with_score("H1", "E1", 2)
        .with_score("H2", "E1", -3)
        .with_score("H3", "E2", 1);

    let first = compute_likelihood(&snapshot).unwrap();
    let second = compute_likelihood(&snapshot).unwrap();
    assert_eq!(first, second);

    let first = compute_diagnosticity(&snapshot).unwrap();
    let second = compute_diagnosticity(&snapshot).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_out_of_range_score_rejects_snapshot() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Linear, hypotheses(2))
        .with_evidence("E1")
        .with_score("H1", "E1", 4);

    let err = compute_likelihood(&snapshot).unwrap_err();
    assert_eq!(
        err,
        EngineError::OutOfRange {
            scale: ScaleType::Linear,
            value: 4,
            min: -3,
            max: 3,
        }
    );
    assert!(compute_diagnosticity(&snapshot).is_err());
}

#[test]
fn test_single_hypothesis_is_insufficient() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(1))
        .with_evidence("E1")
        .with_score("H1", "E1", 2);

    assert!(matches!(
        compute_diagnosticity(&snapshot),
        Err(EngineError::InsufficientHypotheses { required: 2, actual: 1 })
    ));
    assert!(matches!(
        compute_likelihood(&snapshot),
        Err(EngineError::InsufficientHypotheses { required: 2, actual: 1 })
    ));
}

#[test]
fn test_no_evidence_yields_empty_diagnosticity() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(3));
    let diag = compute_diagnosticity(&snapshot).unwrap().value;
    assert!(diag.is_empty());

    // Nothing scored: every hypothesis ties at 0.
    let likelihood = compute_likelihood(&snapshot).unwrap().value;
    assert_eq!(likelihood.results.len(), 3);
    assert!(likelihood.results.iter().all(|r| r.weighted_score == 0));
    assert_eq!(likelihood.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_orphans_reported_not_fatal() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(2))
        .with_evidence("E1")
        .with_score("H1", "E1", 5)
        .with_score("H9", "E1", 3)
        .with_score("H1", "E9", 3);

    let assessment = compute_likelihood(&snapshot).unwrap();
    assert_eq!(assessment.warnings.len(), 2);
    assert_eq!(assessment.warnings[0].kind, OrphanKind::UnknownHypothesis);
    assert_eq!(assessment.warnings[1].kind, OrphanKind::UnknownEvidence);
    assert_eq!(assessment.value.results[0].weighted_score, 5);
}

#[test]
fn test_strong_evidence_ranks_first() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(3))
        .with_evidence("weak")
        .with_evidence("strong")
        .with_score("H1", "weak", 1)
        .with_score("H1", "strong", 5)
        .with_score("H3", "strong", -5);

    let mut diag = compute_diagnosticity(&snapshot).unwrap().value;
    sort_by_diagnosticity(&mut diag);
    assert_eq!(diag[0].evidence_id.as_str(), "strong");
    assert_eq!(diag[0].score, 100);
    assert_eq!(diag[1].score, 10);

    let likelihood = compute_likelihood(&snapshot).unwrap().value;
    assert_eq!(likelihood.leader().unwrap().hypothesis_id.as_str(), "H1");
    assert_eq!(likelihood.confidence, ConfidenceLevel::High);
}

#[test]
fn test_policy_applies_through_engine() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(2))
        .with_evidence("E1")
        .with_score("H1", "E1", 1);

    let lenient = HypothesisEngine::new(LikelihoodPolicy::new(200.0, 150.0).unwrap());
    let assessment = lenient.compute_likelihood(&snapshot).unwrap();
    assert_eq!(assessment.value.confidence, ConfidenceLevel::Low);
}

#[test]
fn test_session_round_trip_through_engine() {
    let mut session = AnalysisSession::new(
        "Outage",
        ScaleType::Linear,
        hypotheses(2),
        vec![EvidenceRef::new("E1"), EvidenceRef::new("E2")],
    )
    .unwrap();
    session.set_score(&"H1".into(), &"E1".into(), 3).unwrap();
    session.set_score(&"H2".into(), &"E2".into(), -2).unwrap();

    let view = render_matrix(session.matrix());
    assert_eq!(view.rows[0].cells[0].symbol, "++");
    assert_eq!(view.rows[1].cells[1].symbol, "--");

    let completeness = session.completeness();
    assert_eq!(completeness.explicit_cells, 2);
    assert_eq!(completeness.total_cells, 4);

    let likelihood = compute_likelihood(&session.snapshot()).unwrap().value;
    assert_eq!(likelihood.leader().unwrap().hypothesis_id.as_str(), "H1");
}

#[test]
fn test_empty_ids_rejected() {
    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, vec![Hypothesis::new("", "blank", 0)])
        .with_evidence("")
        .with_score("", "", 3);

    let err = compute_likelihood(&snapshot).unwrap_err();
    assert_eq!(err, EngineError::EmptyHypothesisId);
    assert_eq!(err.kind(), "empty_hypothesis_id");

    let snapshot = AnalysisSnapshot::new(ScaleType::Logarithmic, hypotheses(2)).with_evidence("");
    let err = compute_diagnosticity(&snapshot).unwrap_err();
    assert_eq!(err.kind(), "empty_evidence_id");
}
