//! Search query types for the search sync layer.
//!
//! This module defines the backend-agnostic parts of a search request: the
//! filter/sort criteria produced by the query builder and 1-based pagination.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Filter and sort criteria produced by the external query builder.
///
/// The query clause is opaque to this layer; it is passed through to the
/// backend as-is. A missing query matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// The backend query clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,

    /// Sort clauses, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Value>,
}

impl FilterCriteria {
    /// Criteria matching every document.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Criteria wrapping a raw query clause.
    pub fn new(query: Value) -> Self {
        Self {
            query: Some(query),
            sort: Vec::new(),
        }
    }

    /// Simple query string search.
    ///
    /// # Example
    ///
    /// ```
    /// use search_sync_shared::FilterCriteria;
    ///
    /// let criteria = FilterCriteria::query_string("rust async");
    /// assert!(criteria.query.is_some());
    /// ```
    pub fn query_string(query: impl Into<String>) -> Self {
        Self::new(json!({
            "query_string": {
                "query": query.into()
            }
        }))
    }

    /// Append a sort clause.
    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort.push(sort);
        self
    }

    /// The query clause to send, falling back to `match_all`.
    pub fn query_clause(&self) -> Value {
        self.query
            .clone()
            .unwrap_or_else(|| json!({ "match_all": {} }))
    }
}

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number, starting at 1.
    pub page: u32,
    /// Number of hits per page.
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Validate the pagination parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.page == 0 {
            return Err("page must be at least 1".to_string());
        }

        if self.per_page == 0 {
            return Err("per_page must be at least 1".to_string());
        }

        Ok(())
    }

    /// Offset of the first hit on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Maximum number of hits on this page.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offsets() {
        let first = Pagination::new(1, 10);
        assert_eq!(first.offset(), 0);
        assert_eq!(first.limit(), 10);

        let second = Pagination::new(2, 10);
        assert_eq!(second.offset(), 10);
        assert_eq!(second.limit(), 10);

        let fifth = Pagination::new(5, 25);
        assert_eq!(fifth.offset(), 100);
    }

    #[test]
    fn test_pagination_validation() {
        assert!(Pagination::new(1, 1).validate().is_ok());
        assert!(Pagination::new(0, 10).validate().is_err());
        assert!(Pagination::new(3, 0).validate().is_err());
    }

    #[test]
    fn test_filter_criteria_defaults_to_match_all() {
        let criteria = FilterCriteria::match_all();
        assert_eq!(criteria.query_clause(), json!({ "match_all": {} }));
        assert!(criteria.sort.is_empty());
    }

    #[test]
    fn test_filter_criteria_with_sort() {
        let criteria = FilterCriteria::query_string("hello")
            .with_sort(json!({ "created_at": { "order": "desc" } }));

        assert_eq!(
            criteria.query_clause(),
            json!({ "query_string": { "query": "hello" } })
        );
        assert_eq!(criteria.sort.len(), 1);
    }
}
