//! Error types for the search sync repository.
//!
//! This module provides a unified error type for all sync, flush and search operations.

mod search_sync_error;

pub use search_sync_error::SearchSyncError;
