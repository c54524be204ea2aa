//! Search backend trait definition.
//!
//! This module defines the wire-level interface to the document search backend,
//! allowing for different implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::bulk::BulkRequest;
use crate::errors::SearchSyncError;

/// Abstracts the wire client of the search backend.
///
/// Implementations return the backend's JSON responses untouched; interpreting
/// them (bulk error classification, hit extraction) is done by the callers in
/// this crate. Retrying transient network failures is the implementation's
/// business: every error returned here is treated as final.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Send a bulk write.
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` - The raw bulk response, including the top-level `errors` flag
    /// * `Err(SearchSyncError)` - If the request could not be completed
    async fn bulk(&self, request: &BulkRequest) -> Result<Value, SearchSyncError>;

    /// Run a search against an index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index (or comma-separated indices) to search
    /// * `body` - The compiled search body
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchSyncError>;

    /// Delete every document of an index matching a query.
    async fn delete_by_query(&self, index: &str, body: &Value) -> Result<Value, SearchSyncError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchSyncError>;

    /// Refresh an index so recent writes become visible to searches.
    async fn refresh_index(&self, index: &str) -> Result<(), SearchSyncError>;
}
