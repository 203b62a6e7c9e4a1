//! Public types for the sift API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Hits and records
// ============================================================================

pub use sift_core::{Document, Identified, RecordType, SearchHit, TypeKey};

// ============================================================================
// Errors, configuration, cancellation
// ============================================================================

pub use sift_core::{CacheScope, CancelToken, FetchPolicy, ReassemblyConfig, SiftConfig};
pub use sift_core::{SiftError, SiftResult};

// ============================================================================
// Stores
// ============================================================================

pub use sift_backends::{Backend, DirectoryStore, FetchById, MemoryStore};
#[cfg(feature = "sqlite")]
pub use sift_backends::SqliteStore;

// ============================================================================
// Registry and reassembly
// ============================================================================

pub use sift_engine::{
    Reassembled, Reassembler, Reassembly, ReassemblyStats, Registry, RegistrySnapshot,
    TypeRegistration,
};

// ============================================================================
// Responses
// ============================================================================

pub use sift_search::{MultiModel, Records, Results, SearchResponse, SearchResult, Total};
