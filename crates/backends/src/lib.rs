//! Record-store backends for sift
//!
//! Each registered record type is bound to exactly one [`Backend`] when it
//! registers. The set of backends is closed; anything else plugs in through
//! [`Backend::Custom`] and the [`FetchById`] trait.
//!
//! Every backend:
//! - accepts any number of ids in one call
//! - may return fewer records than requested (missing records are not errors)
//! - stamps each returned [`Document`] with its own stored id

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::fmt;
use std::sync::Arc;

use sift_core::{CancelToken, Document, RecordType, SiftResult};

pub use directory::DirectoryStore;
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Batch fetch capability for caller-supplied record stores.
pub trait FetchById: Send + Sync {
    /// Fetch the records with the given ids.
    ///
    /// Ids with no stored record are silently left out of the result.
    fn fetch_by_id(
        &self,
        record_type: &RecordType,
        ids: &[String],
        cancel: &CancelToken,
    ) -> SiftResult<Vec<Document>>;
}

/// The record store a registered record type lives in.
#[derive(Clone)]
pub enum Backend {
    /// In-process map
    Memory(MemoryStore),
    /// One JSON file per record
    Directory(DirectoryStore),
    /// SQLite table
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
    /// Caller-supplied adapter
    Custom(Arc<dyn FetchById>),
}

impl Backend {
    /// Wrap a caller-supplied adapter.
    pub fn custom(adapter: impl FetchById + 'static) -> Self {
        Backend::Custom(Arc::new(adapter))
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::Directory(_) => "directory",
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(_) => "sqlite",
            Backend::Custom(_) => "custom",
        }
    }

    /// True when both backends read from the same underlying store.
    ///
    /// Memory and SQLite stores compare by shared handle, directory stores by
    /// root path, custom adapters by allocation.
    pub fn same_store(&self, other: &Backend) -> bool {
        match (self, other) {
            (Backend::Memory(a), Backend::Memory(b)) => a.same_store(b),
            (Backend::Directory(a), Backend::Directory(b)) => a.root() == b.root(),
            #[cfg(feature = "sqlite")]
            (Backend::Sqlite(a), Backend::Sqlite(b)) => a.same_store(b),
            (Backend::Custom(a), Backend::Custom(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }

    /// Fetch records of `record_type` by id from this backend.
    pub fn fetch_by_id(
        &self,
        record_type: &RecordType,
        ids: &[String],
        cancel: &CancelToken,
    ) -> SiftResult<Vec<Document>> {
        cancel.check()?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Backend::Memory(store) => Ok(store.fetch(record_type, ids)),
            Backend::Directory(store) => store.fetch(record_type, ids, cancel),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => store.fetch(record_type, ids, cancel),
            Backend::Custom(adapter) => adapter.fetch_by_id(record_type, ids, cancel),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Memory(store) => f.debug_tuple("Memory").field(&store.len()).finish(),
            Backend::Directory(store) => f.debug_tuple("Directory").field(&store.root()).finish(),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(store) => f.debug_tuple("Sqlite").field(&store.table()).finish(),
            Backend::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl From<MemoryStore> for Backend {
    fn from(store: MemoryStore) -> Self {
        Backend::Memory(store)
    }
}

impl From<DirectoryStore> for Backend {
    fn from(store: DirectoryStore) -> Self {
        Backend::Directory(store)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteStore> for Backend {
    fn from(store: SqliteStore) -> Self {
        Backend::Sqlite(store)
    }
}
