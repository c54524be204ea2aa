//! Record store trait definition.

use async_trait::async_trait;
use futures::stream::BoxStream;
use search_sync_shared::{RecordId, RecordType, StoredRecord};

use crate::errors::SearchSyncError;

/// A finite, non-restartable stream of records from the store.
pub type RecordCursor = BoxStream<'static, Result<StoredRecord, SearchSyncError>>;

/// Number of identities requested per cursor unless the store says otherwise.
pub const DEFAULT_CURSOR_PAGE_SIZE: usize = 500;

/// The source-of-truth store the index mirrors.
///
/// Only used to hydrate search hits lazily. The store chooses how to query for
/// the identities (for example `WHERE key = ANY(...)`) and makes no promise
/// about the order in which records come back.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a cursor over the records of `record_type` whose identity is in `ids`.
    ///
    /// Callers never pass more than [`page_size`](RecordStore::page_size)
    /// identities at once. Identities with no matching record are simply
    /// absent from the cursor.
    async fn cursor_by_identities(
        &self,
        record_type: &RecordType,
        ids: Vec<RecordId>,
    ) -> Result<RecordCursor, SearchSyncError>;

    /// Maximum number of identities per cursor.
    fn page_size(&self) -> usize {
        DEFAULT_CURSOR_PAGE_SIZE
    }
}
