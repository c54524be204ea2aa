//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesExistsParts, IndicesRefreshParts},
    BulkParts, DeleteByQueryParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::bulk::BulkRequest;
use crate::errors::SearchSyncError;
use crate::interfaces::SearchBackend;

/// OpenSearch backend implementation.
///
/// A thin wire client: responses are returned as raw JSON and only non-success
/// HTTP statuses are turned into errors.
///
/// # Example
///
/// ```ignore
/// let backend = OpenSearchBackend::new("http://localhost:9200")?;
/// let engine = SearchSyncEngine::new(Arc::new(backend));
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a new OpenSearch backend for the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(SearchSyncError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, SearchSyncError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchSyncError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchSyncError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch backend");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Turn a non-success response into `BackendError`, else read its JSON body.
    async fn json_body(response: Response, operation: &str) -> Result<Value, SearchSyncError> {
        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "{} request failed", operation);
            return Err(SearchSyncError::backend(status.as_u16(), error_body));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn bulk(&self, request: &BulkRequest) -> Result<Value, SearchSyncError> {
        let body: Vec<JsonBody<Value>> = request.lines().into_iter().map(JsonBody::new).collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await?;

        let value = Self::json_body(response, "Bulk").await?;
        debug!(operations = request.len(), "Bulk request completed");
        Ok(value)
    }

    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchSyncError> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await?;

        Self::json_body(response, "Search").await
    }

    async fn delete_by_query(&self, index: &str, body: &Value) -> Result<Value, SearchSyncError> {
        let response = self
            .client
            .delete_by_query(DeleteByQueryParts::Index(&[index]))
            .body(body.clone())
            .send()
            .await?;

        Self::json_body(response, "Delete by query").await
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchSyncError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await?;

        let status = response.status_code();
        match status.as_u16() {
            404 => Ok(false),
            _ if status.is_success() => Ok(true),
            code => {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "Index exists check failed");
                Err(SearchSyncError::backend(code, error_body))
            }
        }
    }

    async fn refresh_index(&self, index: &str) -> Result<(), SearchSyncError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await?;

        Self::json_body(response, "Refresh").await?;
        debug!(index = %index, "Index refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(matches!(
            OpenSearchBackend::new("not a url"),
            Err(SearchSyncError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_new_accepts_valid_url() {
        assert!(OpenSearchBackend::new("http://localhost:9200").is_ok());
    }
}
