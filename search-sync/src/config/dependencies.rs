//! Dependency initialization and wiring for the admin tool.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{AdminConfig, ConnectionMode};
use crate::AdminError;
use search_sync_repository::{
    OpenSearchBackend, PostgresRecordStore, SearchBackend, SearchSyncEngine,
};

/// Index checked to confirm the backend is reachable.
const HEALTH_CHECK_INDEX: &str = "_all";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured engine ready to run commands.
    pub engine: SearchSyncEngine,
    /// The settings the engine was built from.
    pub config: AdminConfig,
}

impl Dependencies {
    /// Initialize all dependencies from `config`.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AdminError)` - If initialization fails (OpenSearch only in fail-fast mode)
    pub async fn new(config: AdminConfig) -> Result<Self, AdminError> {
        info!(
            opensearch_url = %config.opensearch_url,
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            record_store = config.database_url.is_some(),
            "Initializing dependencies"
        );

        let backend = Self::connect_to_opensearch(
            &config.opensearch_url,
            config.connection_mode,
            config.retry_interval,
        )
        .await?;

        info!("OpenSearch connection established");

        let mut engine = SearchSyncEngine::with_config(Arc::new(backend), config.sync_config());

        if let Some(database_url) = &config.database_url {
            let store = Self::connect_to_postgres(database_url, &config).await?;
            engine = engine.with_record_store(Arc::new(store));
            info!("Record store connection established");
        }

        Ok(Self { engine, config })
    }

    /// Assemble dependencies from an already built engine.
    pub fn from_parts(engine: SearchSyncEngine, config: AdminConfig) -> Self {
        Self { engine, config }
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchBackend, AdminError> {
        loop {
            match Self::try_connect_opensearch(url).await {
                Ok(backend) => return Ok(backend),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(AdminError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch.
    async fn try_connect_opensearch(url: &str) -> Result<OpenSearchBackend, AdminError> {
        let backend = OpenSearchBackend::new(url).map_err(|e| {
            AdminError::config(format!("Failed to create OpenSearch backend: {}", e))
        })?;

        // Building the transport does not touch the network.
        backend.index_exists(HEALTH_CHECK_INDEX).await?;

        Ok(backend)
    }

    /// Connect to the PostgreSQL record store.
    async fn connect_to_postgres(
        url: &str,
        config: &AdminConfig,
    ) -> Result<PostgresRecordStore, AdminError> {
        let pool = sqlx::PgPool::connect(url)
            .await
            .map_err(|e| AdminError::config(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let store = PostgresRecordStore::new(pool)
            .with_key_column(config.key_column.clone())
            .map_err(|e| AdminError::config(format!("Invalid RECORD_KEY_COLUMN: {}", e)))?
            .with_page_size(config.page_size);

        Ok(store)
    }
}
