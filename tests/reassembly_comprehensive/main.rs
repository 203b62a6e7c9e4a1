//! Reassembly Comprehensive Test Suite
//!
//! End-to-end tests through the public `sift` facade.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Reassembly contract (order, batching, duplicates, missing, unknown)
//! - **Tier 2**: Configuration-driven behaviour (policies, concurrency, deadlines)
//! - **Tier 3**: Record stores (directory, custom, SQLite)
//! - **Tier 4**: Process-wide registry
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test reassembly_comprehensive
//! cargo test --test reassembly_comprehensive --features sqlite
//! ```

mod test_utils;

// Tier 1: Reassembly contract
mod tier1_contract;


// Tier 3: Record stores
mod tier3_stores;

// Tier 4: Process-wide registry
mod tier4_global_registry;
