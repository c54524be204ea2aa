//! The `sync` and `delete` commands.

use search_sync_repository::SearchSyncEngine;
use search_sync_shared::StoredRecord;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::AdminError;

/// Read the JSON lines file at `path` into records bound for `index`.
///
/// Every non-blank line must be a JSON object carrying its identity under
/// `key_field`.
pub async fn load_records(
    path: &Path,
    index: &str,
    key_field: &str,
) -> Result<Vec<StoredRecord>, AdminError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AdminError::input(format!("{}: {}", path.display(), e)))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            let document = match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(document)) => document,
                Ok(_) => {
                    return Err(AdminError::input(format!(
                        "line {}: expected a JSON object",
                        number + 1
                    )))
                }
                Err(e) => return Err(AdminError::input(format!("line {}: {}", number + 1, e))),
            };

            StoredRecord::from_keyed_document(document, key_field, index).ok_or_else(|| {
                AdminError::input(format!(
                    "line {}: missing string or numeric '{}' field",
                    number + 1,
                    key_field
                ))
            })
        })
        .collect()
}

/// Batch size for `engine`, falling back to everything at once when unlimited.
fn batch_size(engine: &SearchSyncEngine, total: usize) -> usize {
    engine.config().max_batch_size.unwrap_or(total).max(1)
}

/// Index `records`, split into batches the engine accepts.
pub async fn run_sync<W: Write>(
    engine: &SearchSyncEngine,
    records: &[StoredRecord],
    out: &mut W,
) -> Result<(), AdminError> {
    let mut synced = 0;
    for batch in records.chunks(batch_size(engine, records.len())) {
        synced += engine.sync_upsert(batch).await?;
        info!(synced = synced, total = records.len(), "Sync progress");
    }

    writeln!(out, "{}", json!({ "synced": synced }))?;
    Ok(())
}

/// Remove the documents with identities `ids` from `index`.
pub async fn run_delete<W: Write>(
    engine: &SearchSyncEngine,
    index: &str,
    ids: &[String],
    out: &mut W,
) -> Result<(), AdminError> {
    let records: Vec<StoredRecord> = ids
        .iter()
        .map(|id| StoredRecord::new(id.as_str(), index, Map::new()))
        .collect();

    let mut deleted = 0;
    for batch in records.chunks(batch_size(engine, records.len())) {
        deleted += engine.sync_delete(batch).await?;
    }

    writeln!(out, "{}", json!({ "deleted": deleted }))?;
    Ok(())
}
