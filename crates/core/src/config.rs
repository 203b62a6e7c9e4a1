//! Reassembly configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! [reassembly]
//! concurrent_fetch = true
//! fetch_policy = "tolerate"
//! cache_scope = "shared"
//! typeless_markers = ["_doc"]
//! deadline_ms = 250
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{SiftError, SiftResult};
use crate::types::DEFAULT_TYPELESS_MARKERS;

/// What to do when one per-type fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Fail the whole call (default).
    #[default]
    FailFast,
    /// Drop the failed type's hits and keep going.
    Tolerate,
}

/// Lifetime of the (index, type) → registration resolution cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// Memoize for one call only (default).
    #[default]
    PerCall,
    /// Share across calls; invalidated whenever the registry changes.
    Shared,
}

/// Settings for one reassembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReassemblyConfig {
    /// Run per-type fetches in parallel
    pub concurrent_fetch: bool,
    /// Failure policy for per-type fetches
    pub fetch_policy: FetchPolicy,
    /// Resolution cache lifetime
    pub cache_scope: CacheScope,
    /// `_type` values treated as "no real type"
    pub typeless_markers: Vec<String>,
    /// Per-call deadline in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for ReassemblyConfig {
    fn default() -> Self {
        Self {
            concurrent_fetch: false,
            fetch_policy: FetchPolicy::FailFast,
            cache_scope: CacheScope::PerCall,
            typeless_markers: DEFAULT_TYPELESS_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            deadline_ms: None,
        }
    }
}

impl ReassemblyConfig {
    /// The per-call deadline as a Duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiftConfig {
    /// `[reassembly]` section
    pub reassembly: ReassemblyConfig,
}

impl SiftConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> SiftResult<Self> {
        toml::from_str(s).map_err(|e| SiftError::config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> SiftResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SiftError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> SiftResult<String> {
        toml::to_string(self).map_err(|e| SiftError::config(e.to_string()))
    }
}
