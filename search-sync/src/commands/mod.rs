//! Admin commands.
//!
//! Each command runs against the `SearchSyncEngine` held by `Dependencies` and
//! writes its results to the given output, one JSON document per line.

mod flush;
mod search;
mod sync;

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::config::Dependencies;
use crate::AdminError;

pub use flush::run_flush;
pub use search::run_search;
pub use sync::{load_records, run_delete, run_sync};

/// Admin tool for the search sync layer.
#[derive(Debug, Parser)]
#[command(name = "search-sync")]
#[command(about = "Flush, sync and query OpenSearch indices", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// A parsed admin command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Delete every document of an index
    Flush {
        /// Index to clear
        index: String,
    },

    /// Print one page of hits as JSON lines
    Search {
        /// Index to search
        index: String,
        /// Query string; `*` matches everything
        query: String,
        /// 1-based page number
        #[arg(default_value_t = 1)]
        page: u32,
        /// Hits per page
        #[arg(default_value_t = 20)]
        per_page: u32,
    },

    /// Index the JSON documents of a file, one per line
    Sync {
        /// Target index
        index: String,
        /// JSON lines file
        path: PathBuf,
    },

    /// Remove documents by identity
    Delete {
        /// Index holding the documents
        index: String,
        /// Identities to remove
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

impl Command {
    /// Run the command, writing results to `out`.
    pub async fn run<W: Write>(&self, deps: &Dependencies, out: &mut W) -> Result<(), AdminError> {
        match self {
            Self::Flush { index } => run_flush(&deps.engine, index, out).await,
            Self::Search {
                index,
                query,
                page,
                per_page,
            } => run_search(&deps.engine, index, query, *page, *per_page, out).await,
            Self::Sync { index, path } => {
                let records = load_records(path, index, &deps.config.key_column).await?;
                run_sync(&deps.engine, &records, out).await
            }
            Self::Delete { index, ids } => run_delete(&deps.engine, index, ids, out).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(values: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("search-sync").chain(values.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn test_parse_flush() {
        assert_eq!(
            parse(&["flush", "posts"]).unwrap(),
            Command::Flush {
                index: "posts".to_string()
            }
        );
    }

    #[test]
    fn test_parse_search_defaults() {
        assert_eq!(
            parse(&["search", "posts", "rust"]).unwrap(),
            Command::Search {
                index: "posts".to_string(),
                query: "rust".to_string(),
                page: 1,
                per_page: 20,
            }
        );
    }

    #[test]
    fn test_parse_search_with_page() {
        assert_eq!(
            parse(&["search", "posts", "rust", "3", "50"]).unwrap(),
            Command::Search {
                index: "posts".to_string(),
                query: "rust".to_string(),
                page: 3,
                per_page: 50,
            }
        );
    }

    #[test]
    fn test_parse_delete() {
        assert_eq!(
            parse(&["delete", "posts", "1", "2"]).unwrap(),
            Command::Delete {
                index: "posts".to_string(),
                ids: vec!["1".to_string(), "2".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            vec![],
            vec!["reindex", "posts"],
            vec!["flush"],
            vec!["search", "posts"],
            vec!["search", "posts", "rust", "two"],
            vec!["delete", "posts"],
        ] {
            assert!(parse(&bad).is_err(), "{:?} should be rejected", bad);
        }
    }
}
