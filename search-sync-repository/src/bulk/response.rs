//! Bulk response classification.

use search_sync_shared::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::bulk::BulkRequest;
use crate::errors::SearchSyncError;

/// Bulk operation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Time taken in milliseconds.
    #[serde(default)]
    pub took: Option<u64>,
    /// Whether any item failed.
    pub errors: bool,
    /// Individual item results, in request order.
    #[serde(default)]
    pub items: Vec<BulkItemResult>,
}

/// Bulk item result, keyed by the action that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkItemResult {
    Index(BulkItemStatus),
    Create(BulkItemStatus),
    Update(BulkItemStatus),
    Delete(BulkItemStatus),
}

impl BulkItemResult {
    pub fn status(&self) -> &BulkItemStatus {
        match self {
            BulkItemResult::Index(status)
            | BulkItemResult::Create(status)
            | BulkItemResult::Update(status)
            | BulkItemResult::Delete(status) => status,
        }
    }
}

/// Status of a bulk item operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemStatus {
    /// Index name.
    #[serde(rename = "_index", default)]
    pub index: Option<String>,
    /// Document ID.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Result status (`created`, `updated`, `deleted`, `not_found`).
    #[serde(default)]
    pub result: Option<String>,
    /// HTTP status code.
    pub status: u16,
    /// Full error object, kept verbatim for diagnostics.
    #[serde(default)]
    pub error: Option<Value>,
}

impl BulkItemStatus {
    /// Check if the item reported an error.
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Diagnostic entry for one failed item.
#[derive(Debug, Serialize)]
struct FailedItem<'a> {
    position: usize,
    id: &'a RecordId,
    index: Option<&'a str>,
    status: u16,
    error: &'a Value,
}

/// Classify the raw response of a bulk call.
///
/// The top-level `errors` flag decides the outcome. When it is set, every item
/// carrying an error is collected and rendered as pretty JSON into a
/// `BulkSyncFailure`. Items are correlated with `request` by position, which
/// recovers the identity when the backend omits `_id`.
///
/// # Returns
///
/// * `Ok(())` - If no item failed
/// * `Err(SearchSyncError::BulkSyncFailure)` - If at least one item failed
/// * `Err(SearchSyncError::DiagnosticSerializationFailure)` - If the failed items could not be described
/// * `Err(SearchSyncError::MalformedResponse)` - If the `errors` flag is missing
pub fn classify_bulk_response(request: &BulkRequest, raw: &Value) -> Result<(), SearchSyncError> {
    let has_errors = raw
        .get("errors")
        .and_then(Value::as_bool)
        .ok_or_else(|| SearchSyncError::malformed_response("bulk response has no `errors` flag"))?;

    if !has_errors {
        debug!(count = request.len(), "Bulk request succeeded");
        return Ok(());
    }

    let response: BulkResponse = serde_json::from_value(raw.clone()).map_err(|e| {
        SearchSyncError::diagnostic_serialization(format!(
            "could not read bulk items: {}; raw response: {}",
            e, raw
        ))
    })?;

    let operations = request.operations();
    let mut failed_ids = Vec::new();
    let mut failed_items = Vec::new();

    for (position, item) in response.items.iter().enumerate() {
        let status = item.status();
        let Some(error) = status.error.as_ref() else {
            continue;
        };

        let id = match operations.get(position) {
            Some(operation) => operation.id().clone(),
            None => RecordId::new(status.id.clone().unwrap_or_default()),
        };
        failed_ids.push(id);
        failed_items.push((position, status, error));
    }

    let entries: Vec<FailedItem<'_>> = failed_items
        .iter()
        .zip(&failed_ids)
        .map(|((position, status, error), id)| FailedItem {
            position: *position,
            id,
            index: status.index.as_deref(),
            status: status.status,
            error,
        })
        .collect();

    let diagnostics = serde_json::to_string_pretty(&entries)
        .map_err(|e| SearchSyncError::diagnostic_serialization(e.to_string()))?;

    error!(
        failed = failed_ids.len(),
        total = request.len(),
        "Bulk request reported item failures"
    );

    Err(SearchSyncError::bulk_sync_failure(
        failed_ids,
        request.len(),
        diagnostics,
    ))
}
