//! Raw results
//!
//! Read-only views over the hits of a response. Nothing here touches a
//! record store.

use serde_json::Value;

use sift_core::SearchHit;

/// The hits of one response, as results.
#[derive(Debug, Clone, Copy)]
pub struct Results<'a> {
    hits: &'a [SearchHit],
}

impl<'a> Results<'a> {
    pub(crate) fn new(hits: &'a [SearchHit]) -> Self {
        Self { hits }
    }

    /// Number of results on this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True for an empty page.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Result at `position`.
    pub fn get(&self, position: usize) -> Option<SearchResult<'a>> {
        self.hits.get(position).map(SearchResult)
    }

    /// Results in rank order.
    pub fn iter(&self) -> impl Iterator<Item = SearchResult<'a>> + 'a {
        self.hits.iter().map(SearchResult)
    }

    /// Document ids in rank order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.hits.iter().map(|h| h.id.as_str()).collect()
    }
}

impl<'a> IntoIterator for Results<'a> {
    type Item = SearchResult<'a>;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, SearchHit>, fn(&'a SearchHit) -> SearchResult<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter().map(SearchResult as fn(&'a SearchHit) -> SearchResult<'a>)
    }
}

/// One result: a hit plus accessors over its stored source.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a>(&'a SearchHit);

impl<'a> SearchResult<'a> {
    /// The underlying hit.
    pub fn hit(&self) -> &'a SearchHit {
        self.0
    }

    /// Document id.
    pub fn id(&self) -> &'a str {
        &self.0.id
    }

    /// Index name.
    pub fn index(&self) -> &'a str {
        &self.0.index
    }

    /// Type name as reported.
    pub fn doc_type(&self) -> Option<&'a str> {
        self.0.doc_type.as_deref()
    }

    /// Relevance score.
    pub fn score(&self) -> Option<f64> {
        self.0.score
    }

    /// Stored source.
    pub fn source(&self) -> Option<&'a Value> {
        self.0.source.as_ref()
    }

    /// Highlight fragments.
    pub fn highlight(&self) -> Option<&'a Value> {
        self.0.highlight.as_ref()
    }

    /// Look up a source field by dotted path, e.g. `"author.name"`.
    pub fn field(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.0.source.as_ref()?;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}
