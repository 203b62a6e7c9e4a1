//! In-memory record store
//!
//! Records live in a DashMap keyed by (record type, id), so one store can
//! back several record types whose ids overlap. Clone is cheap (Arc clone)
//! and clones share the same records.

use dashmap::DashMap;
use std::sync::Arc;

use sift_core::{Document, RecordType};

/// In-process record store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<DashMap<(RecordType, String), Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from documents
    pub fn from_documents(docs: impl IntoIterator<Item = Document>) -> Self {
        let store = Self::new();
        for doc in docs {
            store.insert(doc);
        }
        store
    }

    /// Insert or replace a document, returning the previous one
    pub fn insert(&self, doc: Document) -> Option<Document> {
        self.records
            .insert((doc.record_type.clone(), doc.id.clone()), doc)
    }

    /// Remove a document of `record_type` by id
    pub fn remove(&self, record_type: &RecordType, id: &str) -> Option<Document> {
        self.records
            .remove(&(record_type.clone(), id.to_string()))
            .map(|(_, doc)| doc)
    }

    /// Get a document of `record_type` by id
    pub fn get(&self, record_type: &RecordType, id: &str) -> Option<Document> {
        self.records
            .get(&(record_type.clone(), id.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn fetch(&self, record_type: &RecordType, ids: &[String]) -> Vec<Document> {
        ids.iter()
            .filter_map(|id| self.get(record_type, id))
            .collect()
    }

    pub(crate) fn same_store(&self, other: &MemoryStore) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}
