//! Interface definitions for the collaborators of the search sync layer.
//!
//! This module defines the abstract `SearchBackend` (wire client) and
//! `RecordStore` traits that allow for dependency injection and swappable
//! implementations.

mod record_store;
mod search_backend;

pub use record_store::{RecordCursor, RecordStore, DEFAULT_CURSOR_PAGE_SIZE};
pub use search_backend::SearchBackend;
