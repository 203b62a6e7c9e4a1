//! Type registry
//!
//! Maps `(index name, type name | no-type)` to the record type that owns
//! those documents and the backend its records are fetched from.
//!
//! # Design
//!
//! - Copy-on-write: registrations live in an `Arc<Vec<_>>` behind a RwLock.
//!   A snapshot is one Arc clone and never observes a half-applied mutation.
//! - `(index, type)` pairs are unique. A second claim fails with
//!   `DuplicateRegistration` instead of shadowing the first.
//! - Every mutation bumps the generation and clears the shared
//!   resolution cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use sift_backends::Backend;
use sift_core::{RecordType, SiftError, SiftResult, TypeKey};

use crate::cache::ResolutionCache;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

// =============================================================================
// TypeRegistration
// =============================================================================

/// One indexable record type bound to an (index, type) pair.
#[derive(Debug, Clone)]
pub struct TypeRegistration {
    /// Index holding this type's documents
    pub index_name: String,
    /// Type name, `None` for typeless indices
    pub type_name: Option<String>,
    /// Owning record type
    pub record_type: RecordType,
    /// Store the records are fetched from
    pub backend: Backend,
}

impl TypeRegistration {
    /// A typeless registration.
    pub fn new(
        record_type: impl Into<RecordType>,
        index_name: impl Into<String>,
        backend: impl Into<Backend>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            type_name: None,
            record_type: record_type.into(),
            backend: backend.into(),
        }
    }

    /// Set the type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// The (index, type) pair this registration claims.
    pub fn key(&self) -> TypeKey {
        TypeKey::new(self.index_name.clone(), self.type_name.as_deref())
    }

    /// True if a hit from `index` with `doc_type` belongs to this registration.
    ///
    /// Typed hits need an equal type name; typeless hits only match typeless
    /// registrations on the same index.
    pub fn matches(&self, index: &str, doc_type: Option<&str>) -> bool {
        self.index_name == index && self.type_name.as_deref() == doc_type
    }
}

// =============================================================================
// RegistrySnapshot
// =============================================================================

/// Immutable view of the registry at one generation.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    registrations: Arc<Vec<Arc<TypeRegistration>>>,
    generation: u64,
}

impl RegistrySnapshot {
    /// Build a snapshot directly from registrations, without a Registry.
    ///
    /// Duplicate keys are allowed here; resolution returns the first match.
    pub fn from_registrations(registrations: impl IntoIterator<Item = TypeRegistration>) -> Self {
        Self {
            registrations: Arc::new(registrations.into_iter().map(Arc::new).collect()),
            generation: 0,
        }
    }

    /// Generation this snapshot was taken at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scan for the first registration matching a hit's index and type.
    pub fn resolve(&self, index: &str, doc_type: Option<&str>) -> Option<&Arc<TypeRegistration>> {
        self.registrations
            .iter()
            .find(|reg| reg.matches(index, doc_type))
    }

    /// Resolve by key.
    pub fn resolve_key(&self, key: &TypeKey) -> Option<&Arc<TypeRegistration>> {
        self.resolve(&key.index, key.doc_type.as_deref())
    }

    /// Registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeRegistration>> {
        self.registrations.iter()
    }

    /// All registrations of one record type.
    pub fn registrations_for<'a>(
        &'a self,
        record_type: &'a RecordType,
    ) -> impl Iterator<Item = &'a Arc<TypeRegistration>> + 'a {
        self.registrations
            .iter()
            .filter(move |reg| &reg.record_type == record_type)
    }

    /// Distinct record types, in registration order.
    pub fn record_types(&self) -> Vec<RecordType> {
        let mut out: Vec<RecordType> = Vec::new();
        for reg in self.registrations.iter() {
            if !out.contains(&reg.record_type) {
                out.push(reg.record_type.clone());
            }
        }
        out
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Mutable, thread-safe registry of indexable record types.
pub struct Registry {
    registrations: RwLock<Arc<Vec<Arc<TypeRegistration>>>>,
    generation: AtomicU64,
    cache: Arc<ResolutionCache>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(Arc::new(Vec::new())),
            generation: AtomicU64::new(0),
            cache: Arc::new(ResolutionCache::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register a record type for an (index, type) pair.
    pub fn register(&self, registration: TypeRegistration) -> SiftResult<()> {
        if registration.index_name.is_empty() {
            return Err(SiftError::invalid_input("index name must not be empty"));
        }
        if registration.type_name.as_deref() == Some("") {
            return Err(SiftError::invalid_input(
                "type name must not be empty (use a typeless registration)",
            ));
        }

        let mut guard = self.registrations.write();
        if let Some(existing) = guard.iter().find(|reg| {
            reg.matches(
                &registration.index_name,
                registration.type_name.as_deref(),
            )
        }) {
            return Err(SiftError::DuplicateRegistration {
                index: registration.index_name.clone(),
                doc_type: registration.type_name.clone(),
                existing: existing.record_type.to_string(),
            });
        }

        tracing::info!(
            target: "sift::registry",
            record_type = %registration.record_type,
            key = %registration.key(),
            backend = registration.backend.kind(),
            "registered record type"
        );
        Arc::make_mut(&mut guard).push(Arc::new(registration));
        self.bump();
        Ok(())
    }

    /// Remove every registration of `record_type`, returning how many were removed.
    pub fn unregister(&self, record_type: &RecordType) -> usize {
        let mut guard = self.registrations.write();
        let before = guard.len();
        Arc::make_mut(&mut guard).retain(|reg| &reg.record_type != record_type);
        let removed = before - guard.len();
        if removed > 0 {
            tracing::info!(
                target: "sift::registry",
                record_type = %record_type,
                removed,
                "unregistered record type"
            );
            self.bump();
        }
        removed
    }

    /// Remove everything.
    pub fn clear(&self) {
        let mut guard = self.registrations.write();
        if !guard.is_empty() {
            *guard = Arc::new(Vec::new());
            self.bump();
        }
    }

    /// Take an immutable snapshot.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let guard = self.registrations.read();
        RegistrySnapshot {
            registrations: Arc::clone(&guard),
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// Current generation; changes on every mutation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Shared resolution cache, cleared on every mutation.
    pub fn resolution_cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Distinct registered record types, in registration order.
    pub fn record_types(&self) -> Vec<RecordType> {
        self.snapshot().record_types()
    }

    // Called with the write lock held so snapshot generations stay monotonic.
    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate();
    }
}
