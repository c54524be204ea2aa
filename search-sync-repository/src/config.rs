//! Configuration types for the SearchSyncEngine.

/// Configuration for the SearchSyncEngine.
///
/// Controls batch limits for sync calls and whether delete batches get the same
/// partial-failure checking as index batches.
#[derive(Debug, Clone)]
pub struct SearchSyncConfig {
    /// Maximum number of records allowed in a single sync call.
    ///
    /// Set to `None` to disable the limit (not recommended for production).
    /// Defaults to 1000 if not specified.
    pub max_batch_size: Option<usize>,

    /// Classify delete batch responses like index batches.
    ///
    /// Defaults to `false`: delete batches are fire-and-forget and item
    /// failures are only logged.
    pub classify_deletes: bool,
}

impl Default for SearchSyncConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            classify_deletes: false,
        }
    }
}

impl SearchSyncConfig {
    /// Create a config with no batch size limit.
    ///
    /// # Warning
    ///
    /// Use with caution. Removing batch size limits can lead to memory issues
    /// and timeouts when processing very large batches.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Enable or disable failure classification for delete batches.
    pub fn classify_deletes(mut self, enabled: bool) -> Self {
        self.classify_deletes = enabled;
        self
    }
}
