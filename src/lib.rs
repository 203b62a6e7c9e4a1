//! sift: multi-model search result reassembly
//!
//! Record types register the index (and optional type) their documents
//! are searched in, together with the store their records live in. A search
//! response's ranked hits are then turned back into records: one batch fetch
//! per record type, output in the hits' rank order.
//!
//! ```ignore
//! use sift::{MemoryStore, Reassembler, Registry, SearchResponse, TypeRegistration};
//!
//! let registry = Registry::new();
//! registry.register(TypeRegistration::new("Article", "articles", MemoryStore::new()))?;
//!
//! let response = SearchResponse::from_json(body)?;
//! let records = response.records(&Reassembler::new(&registry))?;
//! for (doc, hit) in records.iter_with_hits() {
//!     println!("{} {:?}", doc.id, hit.score);
//! }
//! ```
//!
//! Records whose rows were deleted after indexing are skipped, so a page can
//! hold fewer records than the reported hit total.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;

pub use types::*;

pub use sift_engine::{reassemble, reassemble_with_hits};

/// Load configuration from a TOML file and build a reassembler over `registry`.
pub fn reassembler_from_file<'r>(
    registry: &'r Registry,
    path: impl AsRef<std::path::Path>,
) -> SiftResult<Reassembler<'r>> {
    let config = SiftConfig::from_file(path)?;
    Ok(Reassembler::with_config(registry, config.reassembly))
}
