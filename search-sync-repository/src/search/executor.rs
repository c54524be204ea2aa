//! Dispatching compiled searches.

use search_sync_shared::{Pagination, SearchResultSet};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::errors::SearchSyncError;
use crate::interfaces::SearchBackend;
use crate::search::query::SearchQuery;
use crate::search::request::compile_search_body;
use crate::search::response::parse_search_response;

/// Result of executing a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Hits from the backend, ready to be mapped.
    Hits(SearchResultSet),
    /// Whatever the query's escalation callback returned, untouched.
    Escalated(Value),
}

impl SearchOutcome {
    /// The result set, if the search was not escalated.
    pub fn into_hits(self) -> Option<SearchResultSet> {
        match self {
            SearchOutcome::Hits(results) => Some(results),
            SearchOutcome::Escalated(_) => None,
        }
    }
}

/// Execute `query`, restricted to `pagination` when given.
///
/// The body is compiled first, so a bad page fails before anything is sent. If
/// the query carries an escalation callback it receives the backend and the
/// body and its result is returned as-is; otherwise the body is sent to the
/// query's index and the response parsed into hits.
pub async fn execute_search(
    backend: Arc<dyn SearchBackend>,
    query: &SearchQuery,
    pagination: Option<&Pagination>,
) -> Result<SearchOutcome, SearchSyncError> {
    let body = compile_search_body(&query.criteria, pagination)?;
    let index = query.index_name();

    if let Some(escalation) = &query.escalation {
        debug!(index = %index, "Handing search to escalation callback");
        let result = escalation(backend, body).await?;
        return Ok(SearchOutcome::Escalated(result));
    }

    let raw = backend.search(index, &body).await?;
    let results = parse_search_response(&raw)?;

    debug!(
        index = %index,
        hits = results.len(),
        total = ?results.total,
        "Search completed"
    );
    Ok(SearchOutcome::Hits(results))
}
