//! Search sync error types.
//!
//! This module defines the unified error type for sync, flush, search and
//! mapping operations. Callers match on the variant to tell "we know which
//! records failed" apart from "the response could not even be described".

use search_sync_shared::RecordId;
use thiserror::Error;

/// Unified errors from search sync operations.
///
/// No variant is retried or recovered inside this crate; every failure is
/// surfaced to the immediate caller.
#[derive(Debug, Clone, Error)]
pub enum SearchSyncError {
    /// One or more bulk items failed.
    ///
    /// `diagnostics` holds the failed items as pretty-printed JSON so the caller
    /// can reconcile which records need to be synced again.
    #[error("Bulk sync failed for {failed} of {total} items: {diagnostics}")]
    BulkSyncFailure {
        failed: usize,
        total: usize,
        failed_ids: Vec<RecordId>,
        diagnostics: String,
    },

    /// The diagnostics for a failed bulk call could not be rendered.
    #[error("Failed to serialize bulk diagnostics: {0}")]
    DiagnosticSerializationFailure(String),

    /// The backend response is missing an expected field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Lazy mapping was requested for a record type spanning several sources.
    #[error("Lazy mapping is not supported for aggregate record type '{0}'")]
    NotSupportedForAggregateType(String),

    /// The operation is deliberately unsupported.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A caller precondition was violated (bad page number, missing identity).
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// Failed to establish connection to the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The search backend answered with a non-success status.
    #[error("Backend returned status {status}: {body}")]
    BackendError { status: u16, body: String },

    /// The request never produced a response (network failure, timeout).
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The record store failed while producing records.
    #[error("Record store error: {0}")]
    RecordStoreError(String),
}

impl SearchSyncError {
    /// Create a bulk sync failure.
    pub fn bulk_sync_failure(
        failed_ids: Vec<RecordId>,
        total: usize,
        diagnostics: impl Into<String>,
    ) -> Self {
        Self::BulkSyncFailure {
            failed: failed_ids.len(),
            total,
            failed_ids,
            diagnostics: diagnostics.into(),
        }
    }

    /// Create a diagnostic serialization failure.
    pub fn diagnostic_serialization(msg: impl Into<String>) -> Self {
        Self::DiagnosticSerializationFailure(msg.into())
    }

    /// Create a malformed response error.
    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an aggregate type error.
    pub fn not_supported_for_aggregate(record_type: impl Into<String>) -> Self {
        Self::NotSupportedForAggregateType(record_type.into())
    }

    /// Create a not implemented error.
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented(operation.into())
    }

    /// Create a precondition error.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a backend status error.
    pub fn backend(status: u16, body: impl Into<String>) -> Self {
        Self::BackendError {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a record store error.
    pub fn record_store(msg: impl Into<String>) -> Self {
        Self::RecordStoreError(msg.into())
    }
}

impl From<opensearch::Error> for SearchSyncError {
    fn from(err: opensearch::Error) -> Self {
        Self::TransportError(err.to_string())
    }
}

impl From<sqlx::Error> for SearchSyncError {
    fn from(err: sqlx::Error) -> Self {
        Self::RecordStoreError(err.to_string())
    }
}
