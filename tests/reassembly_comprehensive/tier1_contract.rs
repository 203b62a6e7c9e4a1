//! Tier 1: Reassembly contract
//!
//! Rank order, one fetch per record type, duplicate ids, missing records and
//! unknown (index, type) pairs.

use crate::test_utils::*;
use sift::{Document, Reassembler, RecordType, Registry, SearchHit, SiftError, TypeRegistration};

#[test]
fn test_reference_scenario_rank_order() {
    init_tracing();
    let registry = dummy_registry();
    let reassembly = Reassembler::new(&registry).records(&dummy_hits()).unwrap();

    assert_eq!(
        labels(reassembly.records()),
        vec!["TypeB2", "TypeA2", "TypeC1", "TypeB1", "TypeA3"]
    );
    assert_eq!(reassembly.stats().fetch_calls, 3);
    assert_eq!(reassembly.stats().missing, 0);
}

#[test]
fn test_one_fetch_per_record_type() {
    let store = RecordingStore::default();
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("TypeA", "dummy", store.backend()).with_type("dummy_one"))
        .unwrap();
    registry
        .register(TypeRegistration::new("TypeB", "dummy", store.backend()).with_type("dummy_two"))
        .unwrap();

    let hits = vec![
        SearchHit::new("dummy", "dummy_one", "1"),
        SearchHit::new("dummy", "dummy_two", "1"),
        SearchHit::new("dummy", "dummy_one", "2"),
        SearchHit::new("dummy", "dummy_two", "2"),
        SearchHit::new("dummy", "dummy_one", "3"),
    ];
    let out = Reassembler::new(&registry).records(&hits).unwrap();
    assert_eq!(out.len(), 5);

    let calls = store.calls.lock().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ("TypeA".to_string(), vec!["1".into(), "2".into(), "3".into()]));
    assert_eq!(calls[1], ("TypeB".to_string(), vec!["1".into(), "2".into()]));
}

#[test]
fn test_duplicate_hits_fetch_once_emit_twice() {
    let store = RecordingStore::default();
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("TypeA", "dummy", store.backend()))
        .unwrap();

    let hits = vec![
        SearchHit::typeless("dummy", "7"),
        SearchHit::typeless("dummy", "8"),
        SearchHit::typeless("dummy", "7"),
    ];
    let out = Reassembler::new(&registry).records(&hits).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(labels(out.records()), vec!["TypeA7", "TypeA8", "TypeA7"]);
    assert_eq!(store.calls.lock()[0].1, vec!["7".to_string(), "8".to_string()]);
}

#[test]
fn test_missing_record_is_dropped_not_error() {
    let registry = Registry::new();
    registry
        .register(
            TypeRegistration::new("TypeA", "dummy", labelled_store("TypeA", &["1", "3"]))
                .with_type("dummy_one"),
        )
        .unwrap();

    let hits = vec![
        SearchHit::new("dummy", "dummy_one", "1"),
        SearchHit::new("dummy", "dummy_one", "2"),
        SearchHit::new("dummy", "dummy_one", "3"),
    ];
    let out = Reassembler::new(&registry).records(&hits).unwrap();
    assert_eq!(labels(out.records()), vec!["TypeA1", "TypeA3"]);
    assert_eq!(out.stats().missing, 1);
    let hit_ids: Vec<&str> = out.iter_with_hits().map(|(_, h)| h.id.as_str()).collect();
    assert_eq!(hit_ids, vec!["1", "3"]);
}

#[test]
fn test_unknown_type_fails_before_any_fetch() {
    let store = RecordingStore::default();
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("TypeA", "dummy", store.backend()).with_type("dummy_one"))
        .unwrap();

    let hits = vec![
        SearchHit::new("dummy", "dummy_one", "1"),
        SearchHit::new("dummy", "dummy_three", "1"),
    ];
    let err = Reassembler::new(&registry).records(&hits).unwrap_err();
    assert_eq!(err, SiftError::unknown_type("dummy", Some("dummy_three")));
    assert_eq!(store.call_count(), 0);
}

#[test]
fn test_empty_hits_do_nothing() {
    let store = RecordingStore::default();
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("TypeA", "dummy", store.backend()))
        .unwrap();

    let out = Reassembler::new(&registry).records(&[]).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.stats().fetch_calls, 0);
    assert_eq!(store.call_count(), 0);
}

#[test]
fn test_plain_reassemble_with_closure() {
    let registry = dummy_registry();
    let snapshot = registry.snapshot();
    let mut seen: Vec<String> = Vec::new();

    let out = sift::reassemble(&dummy_hits(), &snapshot, |rt: &RecordType, ids: &[String]| {
        seen.push(rt.to_string());
        Ok(ids
            .iter()
            .map(|id| Document::new(rt.clone(), id.clone()))
            .collect::<Vec<Document>>())
    })
    .unwrap();

    assert_eq!(out.len(), 5);
    let types: Vec<&str> = out.iter().map(|d| d.record_type.name()).collect();
    assert_eq!(types, vec!["TypeB", "TypeA", "TypeC", "TypeB", "TypeA"]);
    assert_eq!(seen.len(), 3);
}
