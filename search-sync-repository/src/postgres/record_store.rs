//! PostgreSQL implementation of the record store.
//!
//! Each record type maps to a table named after the type; rows are fetched as
//! JSON objects one page of identities at a time.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use search_sync_shared::{RecordId, RecordType, StoredRecord};
use serde_json::Value;
use tracing::debug;

use crate::errors::SearchSyncError;
use crate::interfaces::{RecordCursor, RecordStore, DEFAULT_CURSOR_PAGE_SIZE};
use crate::utils::validate_identifier;

const DEFAULT_KEY_COLUMN: &str = "id";

/// PostgreSQL-backed record store.
///
/// Identities are split into pages of `page_size`, in the order given, and
/// each page is fetched with a single `= ANY($1)` query only once the previous
/// page has been consumed.
pub struct PostgresRecordStore {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
    key_column: String,
    page_size: usize,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store keyed on the `id` column.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            pool,
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            page_size: DEFAULT_CURSOR_PAGE_SIZE,
        }
    }

    /// Use `column` as the identity column of every table.
    ///
    /// # Returns
    ///
    /// * `Err(SearchSyncError::Precondition)` - If `column` is not a plain identifier
    pub fn with_key_column(mut self, column: impl Into<String>) -> Result<Self, SearchSyncError> {
        let column = column.into();
        validate_identifier("column", &column)?;
        self.key_column = column;
        Ok(self)
    }

    /// Fetch at most `page_size` records per query. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }
}

/// Build the page query for `table`, keyed on `key_column`.
fn select_by_identities_sql(table: &str, key_column: &str) -> Result<String, SearchSyncError> {
    validate_identifier("table", table)?;
    validate_identifier("column", key_column)?;

    Ok(format!(
        "SELECT row_to_json(t) FROM \"{table}\" t WHERE t.\"{key_column}\"::text = ANY($1)"
    ))
}

/// Convert one JSON row into a record of `index_name`.
fn record_from_row(
    row: Value,
    key_column: &str,
    index_name: &str,
) -> Result<StoredRecord, SearchSyncError> {
    let Value::Object(document) = row else {
        return Err(SearchSyncError::record_store("row is not a JSON object"));
    };

    StoredRecord::from_keyed_document(document, key_column, index_name).ok_or_else(|| {
        SearchSyncError::record_store(format!("row has no usable '{}' column", key_column))
    })
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn cursor_by_identities(
        &self,
        record_type: &RecordType,
        ids: Vec<RecordId>,
    ) -> Result<RecordCursor, SearchSyncError> {
        if record_type.is_aggregate {
            return Err(SearchSyncError::not_supported_for_aggregate(&record_type.name));
        }

        let sql = select_by_identities_sql(&record_type.name, &self.key_column)?;
        let pages: Vec<Vec<String>> = ids
            .chunks(self.page_size)
            .map(|page| page.iter().map(|id| id.as_str().to_string()).collect())
            .collect();

        debug!(
            table = %record_type.name,
            identities = ids.len(),
            pages = pages.len(),
            "Opening record cursor"
        );

        let pool = self.pool.clone();
        let key_column = self.key_column.clone();
        let index_name = record_type.index_name.clone();

        let cursor = stream::iter(pages)
            .then(move |page| {
                let pool = pool.clone();
                let sql = sql.clone();
                async move {
                    sqlx::query_scalar::<_, Value>(&sql)
                        .bind(page)
                        .fetch_all(&pool)
                        .await
                }
            })
            .flat_map(move |rows| {
                let items: Vec<Result<StoredRecord, SearchSyncError>> = match rows {
                    Ok(rows) => rows
                        .into_iter()
                        .map(|row| record_from_row(row, &key_column, &index_name))
                        .collect(),
                    Err(e) => vec![Err(SearchSyncError::from(e))],
                };
                stream::iter(items)
            })
            .boxed();

        Ok(cursor)
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_sql() {
        let sql = select_by_identities_sql("posts", "id").unwrap();
        assert_eq!(
            sql,
            "SELECT row_to_json(t) FROM \"posts\" t WHERE t.\"id\"::text = ANY($1)"
        );
    }

    #[test]
    fn test_select_sql_rejects_bad_identifiers() {
        assert!(select_by_identities_sql("posts; DROP TABLE users", "id").is_err());
        assert!(select_by_identities_sql("posts", "id\" OR 1=1 --").is_err());
    }

    #[test]
    fn test_record_from_row_numeric_key() {
        let record = record_from_row(json!({ "id": 42, "title": "Hello" }), "id", "posts").unwrap();

        assert_eq!(record.id, RecordId::from("42"));
        assert_eq!(record.index_name, "posts");
        assert_eq!(record.document["title"], json!("Hello"));
    }

    #[test]
    fn test_record_from_row_custom_key() {
        let record =
            record_from_row(json!({ "slug": "hello-world" }), "slug", "posts").unwrap();
        assert_eq!(record.id, RecordId::from("hello-world"));
    }

    #[test]
    fn test_record_from_row_missing_key() {
        assert!(matches!(
            record_from_row(json!({ "title": "Hello" }), "id", "posts"),
            Err(SearchSyncError::RecordStoreError(_))
        ));
        assert!(matches!(
            record_from_row(json!([1, 2]), "id", "posts"),
            Err(SearchSyncError::RecordStoreError(_))
        ));
    }
}
