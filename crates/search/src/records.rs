//! Materialised records
//!
//! `Records` holds the documents fetched for one response page, in rank
//! order. Hits whose record has been deleted from its store since it was
//! indexed are left out, so `len()` can be smaller than the page size and
//! smaller than `total_hits()`. That is expected, not an error.

use sift_core::{Document, SearchHit};
use sift_engine::{Reassembly, ReassemblyStats};

use crate::response::Total;

/// Records of one response page.
#[derive(Debug, Clone)]
pub struct Records {
    reassembly: Reassembly<Document>,
    total: Option<Total>,
}

impl Records {
    pub(crate) fn new(reassembly: Reassembly<Document>, total: Option<Total>) -> Self {
        Self { reassembly, total }
    }

    /// Number of records materialised.
    pub fn len(&self) -> usize {
        self.reassembly.len()
    }

    /// True when no record was materialised.
    pub fn is_empty(&self) -> bool {
        self.reassembly.is_empty()
    }

    /// Total hit count reported by the engine (may exceed `len()`).
    pub fn total_hits(&self) -> Option<u64> {
        self.total.map(|t| t.value)
    }

    /// Documents in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.reassembly.records()
    }

    /// Documents paired with the hit each came from.
    pub fn iter_with_hits(&self) -> impl Iterator<Item = (&Document, &SearchHit)> {
        self.reassembly.iter_with_hits()
    }

    /// Document ids in rank order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|d| d.id.as_str()).collect()
    }

    /// Reassembly counters.
    pub fn stats(&self) -> &ReassemblyStats {
        self.reassembly.stats()
    }

    /// Consume into documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.reassembly.into_records()
    }
}

impl<'a> IntoIterator for &'a Records {
    type Item = &'a Document;
    type IntoIter = Box<dyn Iterator<Item = &'a Document> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
