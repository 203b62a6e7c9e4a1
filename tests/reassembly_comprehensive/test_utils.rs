//! Shared fixtures for the comprehensive suite.

use std::sync::Arc;

use parking_lot::Mutex;
use sift::{
    Backend, CancelToken, Document, FetchById, MemoryStore, RecordType, Registry, SearchHit, SiftResult,
    TypeRegistration,
};

/// Install a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// Store holding documents `<rt><id>` for each id.
pub fn labelled_store(rt: &str, ids: &[&str]) -> MemoryStore {
    MemoryStore::from_documents(ids.iter().map(|id| {
        Document::new(RecordType::new(rt), *id).with("label", format!("{}{}", rt, id))
    }))
}

/// Registry with TypeA/TypeB on `dummy` and TypeC on `other_index`.
pub fn dummy_registry() -> Registry {
    let registry = Registry::new();
    registry
        .register(
            TypeRegistration::new("TypeA", "dummy", labelled_store("TypeA", &["2", "3"]))
                .with_type("dummy_one"),
        )
        .unwrap();
    registry
        .register(
            TypeRegistration::new("TypeB", "dummy", labelled_store("TypeB", &["1", "2"]))
                .with_type("dummy_two"),
        )
        .unwrap();
    registry
        .register(
            TypeRegistration::new("TypeC", "other_index", labelled_store("TypeC", &["1"]))
                .with_type("dummy_two"),
        )
        .unwrap();
    registry
}

/// The ranked hits of the reference scenario.
pub fn dummy_hits() -> Vec<SearchHit> {
    vec![
        SearchHit::new("dummy", "dummy_two", "2"),
        SearchHit::new("dummy", "dummy_one", "2"),
        SearchHit::new("other_index", "dummy_two", "1"),
        SearchHit::new("dummy", "dummy_two", "1"),
        SearchHit::new("dummy", "dummy_one", "3"),
    ]
}

/// Labels of documents, in order.
pub fn labels<'a>(docs: impl IntoIterator<Item = &'a Document>) -> Vec<String> {
    docs.into_iter()
        .map(|d| {
            d.get("label")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Custom store that records every call and can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub fail: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Register-ready backend sharing this store's call log.
    pub fn backend(&self) -> Backend {
        Backend::custom(self.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl FetchById for RecordingStore {
    fn fetch_by_id(
        &self,
        record_type: &RecordType,
        ids: &[String],
        _cancel: &CancelToken,
    ) -> SiftResult<Vec<Document>> {
        self.calls
            .lock()
            .push((record_type.to_string(), ids.to_vec()));
        if self.fail {
            return Err(sift::SiftError::storage("store offline"));
        }
        Ok(ids
            .iter()
            .map(|id| {
                Document::new(record_type.clone(), id.clone())
                    .with("label", format!("{}{}", record_type, id))
            })
            .collect())
    }
}
