//! Search response parsing
//!
//! Accepts the `hits` envelope of Elasticsearch and OpenSearch responses:
//!
//! ```json
//! {
//!   "took": 3, "timed_out": false,
//!   "hits": {
//!     "total": {"value": 2, "relation": "eq"},
//!     "max_score": 1.3,
//!     "hits": [{"_index": "articles", "_type": "_doc", "_id": "1", "_score": 1.3, "_source": {...}}]
//!   },
//!   "aggregations": {...}
//! }
//! ```
//!
//! `hits.total` may be a bare number (older engines) or a `{value, relation}`
//! object. `_type` may be absent.

use serde::Deserialize;
use serde_json::Value;

use sift_core::{Identified, SearchHit, SiftError, SiftResult};
use sift_engine::{Reassembler, Reassembly};

use crate::records::Records;
use crate::results::Results;

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    took: Option<u64>,
    #[serde(default)]
    timed_out: bool,
    hits: RawHits,
    #[serde(default)]
    aggregations: Option<Value>,
    #[serde(default)]
    suggest: Option<Value>,
}

#[derive(Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object {
        value: u64,
        #[serde(default)]
        relation: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_index")]
    index: String,
    #[serde(rename = "_type", default)]
    doc_type: Option<String>,
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
    #[serde(default)]
    highlight: Option<Value>,
}

impl From<RawHit> for SearchHit {
    fn from(raw: RawHit) -> Self {
        SearchHit {
            index: raw.index,
            doc_type: raw.doc_type,
            id: raw.id,
            score: raw.score,
            source: raw.source,
            highlight: raw.highlight,
        }
    }
}

// =============================================================================
// Total
// =============================================================================

/// How `Total::value` relates to the true hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalRelation {
    /// Exact count
    Eq,
    /// Lower bound (the engine stopped counting)
    Gte,
}

/// Reported total hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Total {
    /// Count
    pub value: u64,
    /// Exactness
    pub relation: TotalRelation,
}

impl From<RawTotal> for Total {
    fn from(raw: RawTotal) -> Self {
        match raw {
            RawTotal::Count(value) => Total {
                value,
                relation: TotalRelation::Eq,
            },
            RawTotal::Object { value, relation } => Total {
                value,
                relation: match relation.as_deref() {
                    Some("gte") => TotalRelation::Gte,
                    _ => TotalRelation::Eq,
                },
            },
        }
    }
}

// =============================================================================
// SearchResponse
// =============================================================================

/// A parsed search response.
#[derive(Debug, Clone)]
pub struct SearchResponse {
    took: Option<u64>,
    timed_out: bool,
    total: Option<Total>,
    max_score: Option<f64>,
    hits: Vec<SearchHit>,
    aggregations: Option<Value>,
    suggest: Option<Value>,
}

impl SearchResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> SiftResult<Self> {
        let raw: RawResponse = serde_json::from_str(body)
            .map_err(|e| SiftError::serialization(format!("invalid search response: {}", e)))?;
        Ok(Self::from_raw(raw))
    }

    /// Parse an already-decoded response.
    pub fn from_value(value: Value) -> SiftResult<Self> {
        let raw: RawResponse = serde_json::from_value(value)
            .map_err(|e| SiftError::serialization(format!("invalid search response: {}", e)))?;
        Ok(Self::from_raw(raw))
    }

    /// Wrap hits that did not come from a JSON body.
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            took: None,
            timed_out: false,
            total: Some(Total {
                value: hits.len() as u64,
                relation: TotalRelation::Eq,
            }),
            max_score: hits.iter().filter_map(|h| h.score).reduce(f64::max),
            hits,
            aggregations: None,
            suggest: None,
        }
    }

    fn from_raw(raw: RawResponse) -> Self {
        let hits: Vec<SearchHit> = raw.hits.hits.into_iter().map(SearchHit::from).collect();
        tracing::trace!(target: "sift::search", hits = hits.len(), "parsed search response");
        Self {
            took: raw.took,
            timed_out: raw.timed_out,
            total: raw.hits.total.map(Total::from),
            max_score: raw.hits.max_score,
            hits,
            aggregations: raw.aggregations,
            suggest: raw.suggest,
        }
    }

    /// Milliseconds the engine spent.
    pub fn took(&self) -> Option<u64> {
        self.took
    }

    /// Whether the engine hit its timeout.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Reported total hit count.
    pub fn total(&self) -> Option<Total> {
        self.total
    }

    /// Highest score in the result set.
    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// Aggregation results, untouched.
    pub fn aggregations(&self) -> Option<&Value> {
        self.aggregations.as_ref()
    }

    /// Suggester results, untouched.
    pub fn suggest(&self) -> Option<&Value> {
        self.suggest.as_ref()
    }

    /// Hits of this page, in rank order, with `_type` as the engine reported
    /// it. Typeless markers such as `_doc` are resolved by the reassembler's
    /// configured marker list, see [`SearchHit::effective_type`].
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    /// Raw results, no datastore access.
    pub fn results(&self) -> Results<'_> {
        Results::new(&self.hits)
    }

    /// Materialise the hits through each registration's backend.
    pub fn records(&self, reassembler: &Reassembler<'_>) -> SiftResult<Records> {
        let reassembly = reassembler.records(&self.hits)?;
        Ok(Records::new(reassembly, self.total))
    }

    /// Materialise the hits through a caller-supplied fetch.
    pub fn reassemble_with<R, F>(&self, reassembler: &Reassembler<'_>, fetch: F) -> SiftResult<Reassembly<R>>
    where
        R: Identified + Clone + Send,
        F: Fn(&sift_core::RecordType, &[String], &sift_core::CancelToken) -> SiftResult<Vec<R>> + Sync,
    {
        reassembler.run(&self.hits, fetch)
    }
}
