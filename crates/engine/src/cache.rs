//! Shared resolution cache
//!
//! Memoizes `(index, type) -> registration` across reassembly calls. Each
//! entry is tagged with the registry generation it was resolved under; a
//! lookup at any other generation misses and evicts the entry. The owning
//! [`Registry`](crate::Registry) also clears the whole cache on mutation.

use std::sync::Arc;

use dashmap::DashMap;
use sift_core::TypeKey;

use crate::registry::TypeRegistration;

/// Generation-tagged `(index, type)` resolution cache.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<TypeKey, (u64, Arc<TypeRegistration>)>,
}

impl ResolutionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resolution made at `generation`.
    pub fn get(&self, key: &TypeKey, generation: u64) -> Option<Arc<TypeRegistration>> {
        let stale = match self.entries.get(key) {
            Some(entry) if entry.0 == generation => return Some(Arc::clone(&entry.1)),
            Some(_) => true,
            None => false,
        };
        if stale {
            self.entries.remove_if(key, |_, (gen, _)| *gen != generation);
        }
        None
    }

    /// Record a resolution made at `generation`.
    pub fn insert(&self, key: TypeKey, generation: u64, registration: Arc<TypeRegistration>) {
        self.entries.insert(key, (generation, registration));
    }

    /// Drop every entry.
    pub fn invalidate(&self) {
        self.entries.clear();
    }

    /// Number of cached resolutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
