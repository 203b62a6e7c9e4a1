//! Tier 3: Record stores
//!
//! One response spread over several kinds of store.

use serde_json::json;
use tempfile::TempDir;

use crate::test_utils::*;
use sift::{
    Backend, DirectoryStore, Document, MemoryStore, Reassembler, RecordType, Registry,
    SearchHit, SearchResponse, TypeRegistration,
};

#[test]
fn test_memory_directory_and_custom_in_one_page() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let notes = DirectoryStore::open(dir.path()).unwrap();
    notes
        .put(&Document::new(RecordType::new("Note"), "n1").with("label", "Noten1"))
        .unwrap();

    let custom = RecordingStore::default();
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("Article", "articles", labelled_store("Article", &["a1"])))
        .unwrap();
    registry
        .register(TypeRegistration::new("Note", "notes", notes))
        .unwrap();
    registry
        .register(TypeRegistration::new("User", "users", Backend::custom(custom.clone())))
        .unwrap();

    let response = SearchResponse::from_value(json!({
        "hits": {
            "total": {"value": 4, "relation": "gte"},
            "hits": [
                {"_index": "users", "_type": "_doc", "_id": "u9", "_score": 3.5},
                {"_index": "notes", "_type": "_doc", "_id": "n1", "_score": 2.0},
                {"_index": "notes", "_type": "_doc", "_id": "n2", "_score": 1.5},
                {"_index": "articles", "_type": "_doc", "_id": "a1", "_score": 1.0}
            ]
        }
    }))
    .unwrap();

    let records = response.records(&Reassembler::new(&registry)).unwrap();
    assert_eq!(labels(records.iter()), vec!["Useru9", "Noten1", "Articlea1"]);
    assert_eq!(records.total_hits(), Some(4));
    assert_eq!(records.stats().missing, 1);
    assert_eq!(custom.call_count(), 1);

    let scores: Vec<Option<f64>> = records.iter_with_hits().map(|(_, h)| h.score).collect();
    assert_eq!(scores, vec![Some(3.5), Some(2.0), Some(1.0)]);
}

#[test]
fn test_deleted_record_after_indexing() {
    let store = labelled_store("Article", &["a1", "a2", "a3"]);
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("Article", "articles", store.clone()))
        .unwrap();
    store.remove(&RecordType::new("Article"), "a2");

    let hits: Vec<SearchHit> = ["a1", "a2", "a3"]
        .iter()
        .map(|id| SearchHit::typeless("articles", *id))
        .collect();
    let out = Reassembler::new(&registry).records(&hits).unwrap();
    assert_eq!(labels(out.records()), vec!["Articlea1", "Articlea3"]);
}

#[test]
fn test_store_shared_across_record_types_filters_by_type() {
    let shared = MemoryStore::from_documents(vec![
        Document::new(RecordType::new("TypeA"), "1").with("label", "TypeA1"),
        Document::new(RecordType::new("TypeB"), "1").with("label", "TypeB1"),
        Document::new(RecordType::new("TypeB"), "2").with("label", "TypeB2"),
    ]);
    assert_eq!(shared.len(), 3);
    let registry = Registry::new();
    registry
        .register(TypeRegistration::new("TypeA", "dummy", shared.clone()).with_type("dummy_one"))
        .unwrap();
    registry
        .register(TypeRegistration::new("TypeB", "dummy", shared).with_type("dummy_two"))
        .unwrap();

    let hits = vec![
        SearchHit::new("dummy", "dummy_two", "2"),
        SearchHit::new("dummy", "dummy_one", "1"),
        SearchHit::new("dummy", "dummy_one", "2"),
        SearchHit::new("dummy", "dummy_two", "1"),
    ];
    let out = Reassembler::new(&registry).records(&hits).unwrap();
    assert_eq!(labels(out.records()), vec!["TypeB2", "TypeA1", "TypeB1"]);
    assert_eq!(out.stats().missing, 1);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use sift::SqliteStore;

    #[test]
    fn test_sqlite_rows_in_rank_order() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("app.db"), "products", "id").unwrap();
        store
            .with_connection(|conn| {
                conn.execute_batch(
                    "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                     INSERT INTO products (id, name) VALUES (1, 'lamp'), (2, 'desk'), (3, 'chair');",
                )
            })
            .unwrap();

        let registry = Registry::new();
        registry
            .register(TypeRegistration::new("Product", "products", store))
            .unwrap();
        registry
            .register(TypeRegistration::new("Article", "articles", labelled_store("Article", &["a1"])))
            .unwrap();

        let hits = vec![
            SearchHit::typeless("products", "3"),
            SearchHit::typeless("articles", "a1"),
            SearchHit::typeless("products", "9"),
            SearchHit::typeless("products", "1"),
        ];
        let out = Reassembler::new(&registry).records(&hits).unwrap();
        let ids: Vec<&str> = out.records().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "a1", "1"]);
        let first = out.records().next().unwrap();
        assert_eq!(first.get("name"), Some(&json!("chair")));
    }
}
