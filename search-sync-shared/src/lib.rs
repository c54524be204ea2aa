//! # Search Sync Shared
//!
//! This crate defines the data structures shared across the search sync layer:
//! record identities and type descriptors, the `Searchable` trait implemented by
//! anything that can be pushed into the index, and the query and result types
//! exchanged with the search backend.

pub mod types;

pub use types::record::{RecordId, RecordType, Searchable, StoredRecord};
pub use types::search_query::{FilterCriteria, Pagination};
pub use types::search_result::{Hit, SearchResultSet};
