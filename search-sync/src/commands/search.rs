//! The `search` command.

use futures::TryStreamExt;
use search_sync_repository::{SearchQuery, SearchSyncEngine};
use search_sync_shared::{FilterCriteria, RecordType};
use std::io::Write;
use tracing::{info, warn};

use crate::AdminError;

/// Query matching every document.
const MATCH_ALL: &str = "*";

/// Print one page of hits for `query` on `index`.
///
/// With a record store attached, hits are hydrated and each line is the full
/// stored record; otherwise each line is the raw hit.
pub async fn run_search<W: Write>(
    engine: &SearchSyncEngine,
    index: &str,
    query: &str,
    page: u32,
    per_page: u32,
    out: &mut W,
) -> Result<(), AdminError> {
    let criteria = if query == MATCH_ALL {
        FilterCriteria::match_all()
    } else {
        FilterCriteria::query_string(query)
    };
    let search = SearchQuery::new(RecordType::new(index, index)).with_criteria(criteria);

    let results = engine
        .search_page(&search, page, per_page)
        .await?
        .into_hits()
        .ok_or_else(|| AdminError::output("search was escalated, no hits to print"))?;

    match engine.total_count(&results) {
        Ok(total) => info!(index = %index, total = total, hits = results.len(), "Search completed"),
        Err(e) => warn!(index = %index, error = %e, "Search response carried no total"),
    }

    if engine.has_record_store() {
        let mut records = engine.map_to_records_lazy(&search, &results).await?;
        while let Some(record) = records.try_next().await? {
            let line =
                serde_json::to_string(&record).map_err(|e| AdminError::output(e.to_string()))?;
            writeln!(out, "{}", line)?;
        }
    } else {
        for hit in &results.hits {
            let line =
                serde_json::to_string(hit).map_err(|e| AdminError::output(e.to_string()))?;
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}
