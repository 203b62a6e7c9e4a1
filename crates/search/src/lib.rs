//! Search response wrappers for sift
//!
//! Parses a search engine's JSON response and exposes it two ways:
//! - `results()`: the raw hits with their `_source`, no datastore access
//! - `records()`: the hits materialised into records through the reassembler
//!
//! `MultiModel` describes the index/type target of a search spanning
//! several registered record types.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod multimodel;
pub mod records;
pub mod response;
pub mod results;

pub use multimodel::MultiModel;
pub use records::Records;
pub use response::{SearchResponse, Total, TotalRelation};
pub use results::{Results, SearchResult};
