//! Search query configuration.

use futures::future::BoxFuture;
use search_sync_shared::{FilterCriteria, Hit, Pagination, RecordType, StoredRecord};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::errors::SearchSyncError;
use crate::interfaces::SearchBackend;

/// Caller-supplied takeover of a search.
///
/// Receives the backend handle and the compiled body; whatever it returns is
/// handed back to the caller unchanged and no result mapping happens.
pub type EscalationCallback = Arc<
    dyn Fn(Arc<dyn SearchBackend>, Value) -> BoxFuture<'static, Result<Value, SearchSyncError>>
        + Send
        + Sync,
>;

/// Caller-supplied conversion of a hit into a record, used by eager mapping.
pub type ResultTransform =
    Arc<dyn Fn(&Hit) -> Result<StoredRecord, SearchSyncError> + Send + Sync>;

/// A search request as produced by the query builder.
#[derive(Clone)]
pub struct SearchQuery {
    /// Record type being searched; resolves the default index.
    pub record_type: RecordType,
    /// Filter and sort criteria.
    pub criteria: FilterCriteria,
    /// Page selection; `None` leaves offset and size to the backend.
    pub pagination: Option<Pagination>,
    /// Index to search instead of the record type's default.
    pub index_override: Option<String>,
    /// Optional takeover of the whole search.
    pub escalation: Option<EscalationCallback>,
    /// Optional per-hit conversion for eager mapping.
    pub transform: Option<ResultTransform>,
}

impl SearchQuery {
    /// Create a query over `record_type`.
    ///
    /// # Example
    ///
    /// ```
    /// use search_sync_repository::SearchQuery;
    /// use search_sync_shared::{FilterCriteria, RecordType};
    ///
    /// let query = SearchQuery::new(RecordType::new("posts", "posts"))
    ///     .with_criteria(FilterCriteria::query_string("rust"));
    /// assert_eq!(query.index_name(), "posts");
    /// ```
    pub fn new(record_type: RecordType) -> Self {
        Self {
            record_type,
            criteria: FilterCriteria::default(),
            pagination: None,
            index_override: None,
            escalation: None,
            transform: None,
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Search `index` instead of the record type's default index.
    pub fn within(mut self, index: impl Into<String>) -> Self {
        self.index_override = Some(index.into());
        self
    }

    pub fn with_escalation<F>(mut self, callback: F) -> Self
    where
        F: Fn(Arc<dyn SearchBackend>, Value) -> BoxFuture<'static, Result<Value, SearchSyncError>>
            + Send
            + Sync
            + 'static,
    {
        self.escalation = Some(Arc::new(callback));
        self
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Hit) -> Result<StoredRecord, SearchSyncError> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// The index this query runs against: the override if set, else the record type's index.
    pub fn index_name(&self) -> &str {
        self.index_override
            .as_deref()
            .unwrap_or(&self.record_type.index_name)
    }
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("record_type", &self.record_type.name)
            .field("index", &self.index_name())
            .field("criteria", &self.criteria)
            .field("pagination", &self.pagination)
            .field("escalation", &self.escalation.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_override_takes_precedence() {
        let query = SearchQuery::new(RecordType::new("posts", "posts_v1"));
        assert_eq!(query.index_name(), "posts_v1");

        let query = query.within("posts_archive");
        assert_eq!(query.index_name(), "posts_archive");
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let query = SearchQuery::new(RecordType::new("posts", "posts"))
            .with_transform(|hit| Ok(StoredRecord::new(hit.id.clone(), "posts", hit.source.clone())));

        let rendered = format!("{:?}", query);
        assert!(rendered.contains("transform: true"));
        assert!(rendered.contains("escalation: false"));
    }
}
