//! # Search Sync Repository
//!
//! This crate keeps a document search index in step with a record store and
//! translates queries against it. It includes bulk request building and
//! response classification, index flushing, search compilation and execution,
//! and eager or lazy mapping of hits back to records, plus concrete
//! implementations for OpenSearch and PostgreSQL.

pub mod bulk;
pub mod config;
pub mod errors;
pub mod flush;
pub mod interfaces;
pub mod mapping;
pub mod opensearch;
pub mod postgres;
pub mod search;
pub mod service;
pub mod utils;

pub use bulk::{classify_bulk_response, BulkAction, BulkOperation, BulkRequest};
pub use config::SearchSyncConfig;
pub use errors::SearchSyncError;
pub use interfaces::{RecordCursor, RecordStore, SearchBackend};
pub use mapping::{HitRef, MappedRecord, RecordStream};
pub use opensearch::OpenSearchBackend;
pub use postgres::PostgresRecordStore;
pub use search::{EscalationCallback, ResultTransform, SearchOutcome, SearchQuery};
pub use service::SearchSyncEngine;
pub use utils::validate_identifier;
