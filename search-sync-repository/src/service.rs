//! Search sync engine.
//!
//! This module provides the public surface of the sync layer. Higher layers
//! (admin commands, HTTP handlers) use it to push record changes into the
//! index, clear indices, run searches and map hits back to records.

use search_sync_shared::{Pagination, RecordType, SearchResultSet, Searchable};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::bulk::{classify_bulk_response, BulkRequest};
use crate::config::SearchSyncConfig;
use crate::errors::SearchSyncError;
use crate::flush::flush_index;
use crate::interfaces::{RecordStore, SearchBackend};
use crate::mapping::{map_hits, map_hits_lazy, MappedRecord, RecordStream};
use crate::search::{execute_search, total_count, SearchOutcome, SearchQuery};

/// The main entry point of the search sync layer.
///
/// The engine holds no mutable state; every call is independent and the engine
/// can be shared freely between tasks. All collaborator failures are returned
/// to the caller unchanged in kind and are never retried here.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use search_sync_repository::opensearch::OpenSearchBackend;
/// use search_sync_repository::{SearchQuery, SearchSyncEngine};
/// use search_sync_shared::{FilterCriteria, RecordType};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = OpenSearchBackend::new("http://localhost:9200")?;
/// let engine = SearchSyncEngine::new(Arc::new(backend));
///
/// let posts = RecordType::new("posts", "posts");
/// let query = SearchQuery::new(posts).with_criteria(FilterCriteria::query_string("rust"));
///
/// if let Some(results) = engine.search_page(&query, 1, 20).await?.into_hits() {
///     println!("{} matching posts", engine.total_count(&results)?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchSyncEngine {
    backend: Arc<dyn SearchBackend>,
    store: Option<Arc<dyn RecordStore>>,
    config: SearchSyncConfig,
}

impl SearchSyncEngine {
    /// Create a new engine with default configuration and no record store.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            store: None,
            config: SearchSyncConfig::default(),
        }
    }

    /// Create a new engine with custom configuration.
    pub fn with_config(backend: Arc<dyn SearchBackend>, config: SearchSyncConfig) -> Self {
        Self {
            backend,
            store: None,
            config,
        }
    }

    /// Attach the record store used for lazy mapping.
    pub fn with_record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &SearchSyncConfig {
        &self.config
    }

    /// Whether lazy mapping is available.
    pub fn has_record_store(&self) -> bool {
        self.store.is_some()
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchSyncError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchSyncError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Index (create or replace) the documents of `records`.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of records synced; an empty slice sends nothing
    /// * `Err(SearchSyncError::BatchSizeExceeded)` - If the batch exceeds the configured maximum
    /// * `Err(SearchSyncError::Precondition)` - If a record has no identity
    /// * `Err(SearchSyncError::BulkSyncFailure)` - If any item failed, with per-item diagnostics
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn sync_upsert<R: Searchable>(&self, records: &[R]) -> Result<usize, SearchSyncError> {
        if records.is_empty() {
            return Ok(0);
        }

        self.validate_batch_size(records.len())?;

        let request = BulkRequest::index(records)?;
        let response = self.backend.bulk(&request).await?;
        classify_bulk_response(&request, &response)?;

        debug!(count = request.len(), "Records synced to search index");
        Ok(request.len())
    }

    /// Remove the documents of `records` from their indices.
    ///
    /// Item failures are only classified when `classify_deletes` is enabled;
    /// otherwise they are logged and the call succeeds.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn sync_delete<R: Searchable>(&self, records: &[R]) -> Result<usize, SearchSyncError> {
        if records.is_empty() {
            return Ok(0);
        }

        self.validate_batch_size(records.len())?;

        let request = BulkRequest::delete(records)?;
        let response = self.backend.bulk(&request).await?;

        if self.config.classify_deletes {
            classify_bulk_response(&request, &response)?;
        } else if response.get("errors").and_then(Value::as_bool) == Some(true) {
            warn!(
                count = request.len(),
                "Bulk delete reported item failures, ignoring"
            );
        }

        debug!(count = request.len(), "Records removed from search index");
        Ok(request.len())
    }

    /// Delete every document from the index of `record_type`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(deleted))` - The index was cleared and refreshed
    /// * `Ok(None)` - The index does not exist; nothing was sent
    #[instrument(skip(self, record_type), fields(record_type = %record_type.name))]
    pub async fn flush(&self, record_type: &RecordType) -> Result<Option<u64>, SearchSyncError> {
        flush_index(self.backend.as_ref(), record_type).await
    }

    /// Run `query` with its own pagination, if any.
    #[instrument(skip(self, query), fields(index = %query.index_name()))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchSyncError> {
        execute_search(self.backend.clone(), query, query.pagination.as_ref()).await
    }

    /// Run `query` restricted to one page.
    ///
    /// `page` is 1-based; a zero `page` or `per_page` fails before anything is sent.
    #[instrument(skip(self, query), fields(index = %query.index_name()))]
    pub async fn search_page(
        &self,
        query: &SearchQuery,
        page: u32,
        per_page: u32,
    ) -> Result<SearchOutcome, SearchSyncError> {
        let pagination = Pagination::new(page, per_page);
        execute_search(self.backend.clone(), query, Some(&pagination)).await
    }

    /// Map hits to an in-memory list using the query's transform, if any.
    pub fn map_to_records(
        &self,
        query: &SearchQuery,
        results: &SearchResultSet,
    ) -> Result<Vec<MappedRecord>, SearchSyncError> {
        map_hits(results, query.transform.as_ref())
    }

    /// Hydrate hits from the record store as an ordered stream.
    ///
    /// # Returns
    ///
    /// * `Ok(RecordStream)` - Records in hit order
    /// * `Err(SearchSyncError::NotSupportedForAggregateType)` - If the query targets an aggregate type
    /// * `Err(SearchSyncError::Precondition)` - If no record store is attached
    pub async fn map_to_records_lazy(
        &self,
        query: &SearchQuery,
        results: &SearchResultSet,
    ) -> Result<RecordStream, SearchSyncError> {
        let store = self.store.clone().ok_or_else(|| {
            SearchSyncError::precondition("lazy mapping requires a record store")
        })?;

        map_hits_lazy(store, &query.record_type, results).await
    }

    /// Total number of documents matching the search that produced `results`.
    pub fn total_count(&self, results: &SearchResultSet) -> Result<u64, SearchSyncError> {
        total_count(results)
    }

    /// Index creation is not handled by this layer.
    pub async fn create_index(&self, record_type: &RecordType) -> Result<(), SearchSyncError> {
        Err(SearchSyncError::not_implemented(format!(
            "create_index for '{}'",
            record_type.index_name
        )))
    }

    /// Index deletion is not handled by this layer.
    pub async fn delete_index(&self, record_type: &RecordType) -> Result<(), SearchSyncError> {
        Err(SearchSyncError::not_implemented(format!(
            "delete_index for '{}'",
            record_type.index_name
        )))
    }
}
