//! Compilation of criteria and pagination into a search body.

use search_sync_shared::{FilterCriteria, Pagination};
use serde_json::{json, Map, Value};

use crate::errors::SearchSyncError;

/// Build the search body for `criteria`, optionally restricted to one page.
///
/// Pagination maps to `from = (page - 1) * per_page` and `size = per_page`.
/// Without pagination neither field is set and the backend defaults apply.
///
/// # Returns
///
/// * `Ok(Value)` - The search body
/// * `Err(SearchSyncError::Precondition)` - If `page` or `per_page` is zero
pub fn compile_search_body(
    criteria: &FilterCriteria,
    pagination: Option<&Pagination>,
) -> Result<Value, SearchSyncError> {
    let mut body = Map::new();

    body.insert("query".to_string(), criteria.query_clause());

    if !criteria.sort.is_empty() {
        body.insert("sort".to_string(), Value::Array(criteria.sort.clone()));
    }

    if let Some(pagination) = pagination {
        pagination.validate().map_err(SearchSyncError::precondition)?;
        body.insert("from".to_string(), json!(pagination.offset()));
        body.insert("size".to_string(), json!(pagination.limit()));
    }

    Ok(Value::Object(body))
}
