//! The `flush` command.

use search_sync_repository::SearchSyncEngine;
use search_sync_shared::RecordType;
use serde_json::json;
use std::io::Write;

use crate::AdminError;

/// Delete every document of `index` and report how many were removed.
///
/// A missing index is reported with `"deleted": null`.
pub async fn run_flush<W: Write>(
    engine: &SearchSyncEngine,
    index: &str,
    out: &mut W,
) -> Result<(), AdminError> {
    let record_type = RecordType::new(index, index);
    let deleted = engine.flush(&record_type).await?;

    writeln!(out, "{}", json!({ "index": index, "deleted": deleted }))?;
    Ok(())
}
