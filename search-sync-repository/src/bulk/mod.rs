//! Bulk synchronization of records into the search index.
//!
//! Records are turned into a bulk payload of control and document lines, and
//! the backend's answer is classified into success or a `BulkSyncFailure`
//! carrying per-item diagnostics.

mod request;
mod response;

pub use request::{BulkAction, BulkOperation, BulkRequest};
pub use response::{classify_bulk_response, BulkItemResult, BulkItemStatus, BulkResponse};
