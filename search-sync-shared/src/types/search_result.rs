//! Search result types for the search sync layer.
//!
//! This module defines the hits returned by the search backend, kept in the
//! relevance order the backend assigned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::record::RecordId;

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Identity of the record this hit refers to.
    pub id: RecordId,

    /// Index the hit came from.
    pub index: String,

    /// Relevance score from the search engine.
    /// Absent when the search sorts on other fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// The stored `_source` fields.
    #[serde(default)]
    pub source: Map<String, Value>,
}

/// Hits of one search call, ordered by relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// The hits, in index-assigned order.
    pub hits: Vec<Hit>,

    /// Total number of matching documents, when the backend reported it.
    /// May be greater than the number of hits due to pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Time taken to execute the search in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub took_ms: Option<u64>,
}

impl SearchResultSet {
    /// Create an empty result set.
    pub fn empty() -> Self {
        Self {
            hits: Vec::new(),
            total: Some(0),
            took_ms: None,
        }
    }

    /// Create a result set from hits and a total.
    pub fn new(hits: Vec<Hit>, total: Option<u64>) -> Self {
        Self {
            hits,
            total,
            took_ms: None,
        }
    }

    /// Returns true if there are no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns the number of hits in this result set.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Hit identities in relevance order.
    pub fn identities(&self) -> Vec<RecordId> {
        self.hits.iter().map(|hit| hit.id.clone()).collect()
    }
}
