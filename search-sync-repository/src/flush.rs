//! Flushing every document of a record type out of its index.

use search_sync_shared::RecordType;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::SearchSyncError;
use crate::interfaces::SearchBackend;

/// Body of the delete-by-query issued by a flush.
pub fn match_all_body() -> Value {
    json!({ "query": { "match_all": {} } })
}

/// Clear the index of `record_type`.
///
/// Flushing an index that does not exist is a successful no-op. Otherwise all
/// documents are deleted by a match-all query and the index is refreshed so the
/// deletion is visible to the next search. Any failing step ends the flush.
///
/// # Returns
///
/// * `Ok(Some(deleted))` - The index existed; `deleted` is the count the backend reported
/// * `Ok(None)` - The index does not exist, nothing was sent
/// * `Err(SearchSyncError)` - If any step fails
pub async fn flush_index(
    backend: &dyn SearchBackend,
    record_type: &RecordType,
) -> Result<Option<u64>, SearchSyncError> {
    let index = record_type.index_name.as_str();

    if !backend.index_exists(index).await? {
        debug!(index = %index, "Index does not exist, nothing to flush");
        return Ok(None);
    }

    let response = backend.delete_by_query(index, &match_all_body()).await?;
    let deleted = response.get("deleted").and_then(Value::as_u64).unwrap_or(0);

    backend.refresh_index(index).await?;

    info!(
        index = %index,
        record_type = %record_type.name,
        deleted = deleted,
        "Flushed index"
    );
    Ok(Some(deleted))
}
