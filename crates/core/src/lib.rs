//! Core types for sift
//!
//! This crate defines the values every other sift crate speaks in:
//! - `types`: SearchHit, TypeKey, RecordType, Document, the Identified trait
//! - `error`: SiftError taxonomy and the SiftResult alias
//! - `config`: TOML-backed reassembly configuration
//! - `cancel`: cooperative cancellation and deadlines for fetch calls

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod types;

pub use cancel::CancelToken;
pub use config::{CacheScope, FetchPolicy, ReassemblyConfig, SiftConfig};
pub use error::{SiftError, SiftResult};
pub use types::{Document, Identified, RecordType, SearchHit, TypeKey, DEFAULT_TYPELESS_MARKERS};
