//! Integration tests for heuer-store
//!
//! These tests verify the full lifecycle of sessions and their scores.

use heuer_domain::traits::SessionStore;
use heuer_domain::{
    compute_likelihood, EngineError, EvidenceId, EvidenceRef, Hypothesis, HypothesisId,
    ScaleType, ScoreKey, SessionId,
};
use heuer_store::{SqliteStore, StoreError};

fn h(id: &str) -> HypothesisId {
    HypothesisId::from(id)
}

fn e(id: &str) -> EvidenceId {
    EvidenceId::from(id)
}

fn create(store: &mut SqliteStore, scale: ScaleType) -> SessionId {
    store
        .create_session(
            "Supply disruption",
            scale,
            vec![
                Hypothesis::new("H2", "Labour strike", 1),
                Hypothesis::new("H1", "Sabotage", 0),
            ],
            vec![EvidenceRef::new("E1").with_title("Shipping logs"), EvidenceRef::new("E2")],
        )
        .unwrap()
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_get_session() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    let session = store.get_session(id).unwrap().expect("session should exist");
    assert_eq!(session.id(), id);
    assert_eq!(session.title(), "Supply disruption");
    assert_eq!(session.scale(), ScaleType::Logarithmic);

    let ids: Vec<&str> = session.hypotheses().iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["H1", "H2"]);
    assert_eq!(session.evidence()[0].title.as_deref(), Some("Shipping logs"));
    assert_eq!(session.evidence()[1].id.as_str(), "E2");
}

#[test]
fn test_get_missing_session() {
    let store = SqliteStore::new(":memory:").unwrap();
    assert!(store.get_session(SessionId::new()).unwrap().is_none());
}

#[test]
fn test_create_rejects_duplicate_hypotheses() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let result = store.create_session(
        "Dupes",
        ScaleType::Linear,
        vec![Hypothesis::new("H1", "a", 0), Hypothesis::new("H1", "b", 1)],
        Vec::new(),
    );
    assert!(matches!(
        result,
        Err(StoreError::Engine(EngineError::DuplicateHypothesis(_)))
    ));
    assert!(store.list_sessions().unwrap().is_empty());
}

#[test]
fn test_put_score_last_write_wins() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    store.put_score(id, &h("H1"), &e("E1"), 2).unwrap();
    store.put_score(id, &h("H1"), &e("E1"), -4).unwrap();

    let session = store.get_session(id).unwrap().unwrap();
    assert_eq!(session.matrix().get(&h("H1"), &e("E1")), -4);
    assert_eq!(session.completeness().explicit_cells, 1);
}

#[test]
fn test_put_score_validates_range() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Linear);

    let result = store.put_score(id, &h("H1"), &e("E1"), 5);
    assert!(matches!(
        result,
        Err(StoreError::Engine(EngineError::OutOfRange { value: 5, .. }))
    ));

    let session = store.get_session(id).unwrap().unwrap();
    assert!(!session.matrix().has_explicit_score(&h("H1"), &e("E1")));
}

#[test]
fn test_put_score_unknown_ids() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    assert!(matches!(
        store.put_score(id, &h("H9"), &e("E1"), 1),
        Err(StoreError::Engine(EngineError::UnknownHypothesis(_)))
    ));
    assert!(matches!(
        store.put_score(id, &h("H1"), &e("E9"), 1),
        Err(StoreError::Engine(EngineError::UnknownEvidence(_)))
    ));
}

#[test]
fn test_put_score_missing_session() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let result = store.put_score(SessionId::new(), &h("H1"), &e("E1"), 1);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_explicit_zero_is_remembered() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    store.put_score(id, &h("H2"), &e("E2"), 0).unwrap();

    let session = store.get_session(id).unwrap().unwrap();
    assert!(session.matrix().has_explicit_score(&h("H2"), &e("E2")));
    assert!(!session.matrix().has_explicit_score(&h("H1"), &e("E2")));
}

#[test]
fn test_clear_score() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    store.put_score(id, &h("H1"), &e("E1"), 3).unwrap();
    assert!(store.clear_score(id, &h("H1"), &e("E1")).unwrap());
    assert!(!store.clear_score(id, &h("H1"), &e("E1")).unwrap());

    let session = store.get_session(id).unwrap().unwrap();
    assert_eq!(session.completeness().explicit_cells, 0);
}

#[test]
fn test_change_scale_drops_invalid_scores() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);

    store.put_score(id, &h("H1"), &e("E1"), 5).unwrap();
    store.put_score(id, &h("H2"), &e("E1"), -2).unwrap();
    store.put_score(id, &h("H2"), &e("E2"), -4).unwrap();

    let removed = store.change_scale(id, ScaleType::Linear).unwrap();
    assert_eq!(
        removed,
        vec![ScoreKey::new("H1", "E1"), ScoreKey::new("H2", "E2")]
    );

    let session = store.get_session(id).unwrap().unwrap();
    assert_eq!(session.scale(), ScaleType::Linear);
    assert_eq!(session.matrix().get(&h("H2"), &e("E1")), -2);
    assert_eq!(session.completeness().explicit_cells, 1);
}

#[test]
fn test_list_sessions() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let first = create(&mut store, ScaleType::Logarithmic);
    let second = create(&mut store, ScaleType::Linear);

    let sessions = store.list_sessions().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, first);
    assert_eq!(sessions[1].id, second);
    assert_eq!(sessions[1].scale_type, ScaleType::Linear);
    assert_eq!(sessions[0].hypothesis_count, 2);
    assert_eq!(sessions[0].evidence_count, 2);
}

#[test]
fn test_delete_session() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let id = create(&mut store, ScaleType::Logarithmic);
    store.put_score(id, &h("H1"), &e("E1"), 1).unwrap();

    assert!(store.delete_session(id).unwrap());
    assert!(!store.delete_session(id).unwrap());
    assert!(store.get_session(id).unwrap().is_none());
    assert!(store.list_sessions().unwrap().is_empty());
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heuer.db");

    let id = {
        let mut store = SqliteStore::new(&path).unwrap();
        let id = create(&mut store, ScaleType::Logarithmic);
        store.put_score(id, &h("H1"), &e("E1"), 4).unwrap();
        store.put_score(id, &h("H2"), &e("E1"), -4).unwrap();
        id
    };

    let store = SqliteStore::new(&path).unwrap();
    let session = store.get_session(id).unwrap().unwrap();
    let ranking = compute_likelihood(&session.snapshot()).unwrap().value;
    assert_eq!(ranking.leader().unwrap().hypothesis_id.as_str(), "H1");
}
