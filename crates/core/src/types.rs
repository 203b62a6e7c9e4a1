//! Hit and record types
//!
//! A [`SearchHit`] is one ranked result as returned by the search engine.
//! The reassembler only looks at `index`, `doc_type` and `id`; the remaining
//! fields ride along so callers can pair records with scores and sources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type names that mean "no real type" in typeless result sets.
///
/// Search engines that dropped mapping types still report `_doc` in the
/// `_type` slot of older response formats.
pub const DEFAULT_TYPELESS_MARKERS: &[&str] = &["_doc"];

// =============================================================================
// SearchHit
// =============================================================================

/// One ranked search result.
///
/// Hits are immutable values created per response. The position of a hit in
/// its sequence is its relevance rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Backing index name
    pub index: String,
    /// Type discriminator, `None` in typeless result sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Document id within its index/type
    pub id: String,
    /// Relevance score, when the engine reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Stored source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,
    /// Highlight fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<serde_json::Value>,
}

impl SearchHit {
    /// Create a typed hit.
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: Some(doc_type.into()),
            id: id.into(),
            score: None,
            source: None,
            highlight: None,
        }
    }

    /// Create a hit from a typeless result set.
    pub fn typeless(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: id.into(),
            score: None,
            source: None,
            highlight: None,
        }
    }

    /// Attach a relevance score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Attach the stored source document.
    pub fn with_source(mut self, source: serde_json::Value) -> Self {
        self.source = Some(source);
        self
    }

    /// The type used for resolution: `None` when the hit is typeless or its
    /// type is empty or one of the given "no real type" markers.
    pub fn effective_type<S: AsRef<str>>(&self, markers: &[S]) -> Option<&str> {
        match self.doc_type.as_deref() {
            Some("") => None,
            Some(t) if markers.iter().any(|m| m.as_ref() == t) => None,
            other => other,
        }
    }

    /// Clear `doc_type` when it is one of the given "no real type" markers.
    pub fn normalize_type<S: AsRef<str>>(mut self, markers: &[S]) -> Self {
        if self.effective_type(markers).is_none() {
            self.doc_type = None;
        }
        self
    }

    /// The key used to resolve this hit's record type.
    pub fn type_key(&self) -> TypeKey {
        TypeKey {
            index: self.index.clone(),
            doc_type: self.doc_type.clone(),
        }
    }
}

// =============================================================================
// TypeKey
// =============================================================================

/// Resolution key: an index name plus an optional type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeKey {
    /// Index name
    pub index: String,
    /// Type name, `None` for typeless
    pub doc_type: Option<String>,
}

impl TypeKey {
    /// Build a key.
    pub fn new(index: impl Into<String>, doc_type: Option<&str>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.map(str::to_string),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.doc_type {
            Some(t) => write!(f, "{}/{}", self.index, t),
            None => write!(f, "{}/<typeless>", self.index),
        }
    }
}

// =============================================================================
// RecordType
// =============================================================================

/// Opaque handle naming a record type, e.g. `"Article"`.
///
/// Clone is an `Arc` bump.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordType(Arc<str>);

impl RecordType {
    /// Create a record type handle.
    pub fn new(name: impl AsRef<str>) -> Self {
        RecordType(Arc::from(name.as_ref()))
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        RecordType::new(s)
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        RecordType(Arc::from(s))
    }
}

impl Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RecordType::from)
    }
}

// =============================================================================
// Records
// =============================================================================

/// A record that knows its own identifier.
///
/// The reassembler joins fetched records back to hits by this id, not by the
/// id that was requested.
pub trait Identified {
    /// The record's id, stringified for comparison with hit ids.
    fn record_id(&self) -> String;
}

impl<T: Identified + ?Sized> Identified for Arc<T> {
    fn record_id(&self) -> String {
        (**self).record_id()
    }
}

/// A record materialised by one of the built-in backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Owning record type
    pub record_type: RecordType,
    /// Record id
    pub id: String,
    /// Record attributes
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// Create a document with no attributes.
    pub fn new(record_type: RecordType, id: impl Into<String>) -> Self {
        Self {
            record_type,
            id: id.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Set an attribute.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }
}

impl Identified for Document {
    fn record_id(&self) -> String {
        self.id.clone()
    }
}
