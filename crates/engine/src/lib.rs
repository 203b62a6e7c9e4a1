//! Registry and reassembly engine for sift
//!
//! This crate contains:
//! - `registry`: TypeRegistration, Registry, RegistrySnapshot
//! - `cache`: generation-tagged shared resolution cache
//! - `reassemble`: the multi-model result reassembler
//!
//! A search response references records of several types, each living in
//! its own store. The reassembler resolves every hit to its registered
//! record type, fetches each type's records in one batch, and returns the
//! records in the hits' original rank order.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod reassemble;
pub mod registry;

pub use cache::ResolutionCache;
pub use reassemble::{
    reassemble, reassemble_with_hits, Reassembled, Reassembler, Reassembly, ReassemblyStats,
};
pub use registry::{Registry, RegistrySnapshot, TypeRegistration};
