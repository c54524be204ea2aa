//! # Search Sync
//!
//! Admin tool for the search sync layer. It wires an OpenSearch backend and an
//! optional PostgreSQL record store into a `SearchSyncEngine` and exposes a
//! handful of maintenance commands on top of it.
//!
//! ## Commands
//!
//! - `flush <index>`: delete every document of an index
//! - `search <index> <query> [page] [per_page]`: print one page of hits as JSON lines
//! - `sync <index> <file>`: index the JSON documents of a file, one per line
//! - `delete <index> <id>...`: remove documents by identity
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`commands`]: Command line definition and execution

pub mod commands;
pub mod config;

pub use commands::{Cli, Command};
pub use config::{AdminConfig, ConnectionMode, Dependencies};

use search_sync_repository::SearchSyncError;
use thiserror::Error;

/// Errors that can occur during admin tool initialization or execution.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unreadable or malformed input file.
    #[error("Input error: {0}")]
    InputError(String),

    /// Failure writing command output.
    #[error("Output error: {0}")]
    OutputError(String),

    /// Search sync error.
    #[error("Search sync error: {0}")]
    SyncError(#[from] SearchSyncError),
}

impl AdminError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputError(msg.into())
    }

    /// Create an output error.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::OutputError(msg.into())
    }
}

impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        Self::OutputError(err.to_string())
    }
}
