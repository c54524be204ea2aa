//! Admin tool configuration read from environment variables.

use std::env;
use std::time::Duration;
use tracing::warn;

use search_sync_repository::SearchSyncConfig;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default identity column of record tables.
const DEFAULT_KEY_COLUMN: &str = "id";

/// Default number of identities fetched per record store query.
const DEFAULT_PAGE_SIZE: usize = 500;

/// Default maximum number of records per sync call.
const DEFAULT_MAX_BATCH_SIZE: usize = 1000;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection every retry interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings of the admin tool.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub opensearch_url: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    /// Record store connection; lazy hydration is disabled without it.
    pub database_url: Option<String>,
    pub key_column: String,
    pub page_size: usize,
    pub max_batch_size: usize,
    /// Emit JSON logs instead of pretty console output.
    pub json_logs: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            connection_mode: ConnectionMode::Retry,
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
            database_url: None,
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            json_logs: false,
        }
    }
}

impl AdminConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_MODE`: Connection mode - "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `DATABASE_URL`: PostgreSQL URL of the record store (optional)
    /// - `RECORD_KEY_COLUMN`: Identity column of record tables (default: id)
    /// - `RECORD_PAGE_SIZE`: Identities fetched per record store query (default: 500)
    /// - `SYNC_MAX_BATCH_SIZE`: Maximum records per sync call (default: 1000)
    /// - `LOG_FORMAT`: "json" for structured logs, anything else for console output
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            opensearch_url: lookup("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url),
            connection_mode: ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE").as_deref()),
            retry_interval: parsed("OPENSEARCH_RETRY_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_interval),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            key_column: lookup("RECORD_KEY_COLUMN").unwrap_or(defaults.key_column),
            page_size: parsed("RECORD_PAGE_SIZE")
                .map(|n| n as usize)
                .filter(|n| *n > 0)
                .unwrap_or(defaults.page_size),
            max_batch_size: parsed("SYNC_MAX_BATCH_SIZE")
                .map(|n| n as usize)
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_batch_size),
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Engine configuration derived from these settings.
    pub fn sync_config(&self) -> SearchSyncConfig {
        SearchSyncConfig::with_max_batch_size(self.max_batch_size)
    }
}
