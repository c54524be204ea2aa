//! Search Sync Main Entry Point
//!
//! This is the admin binary for the search sync layer. It runs a single
//! maintenance command against OpenSearch and exits.

use dotenv::dotenv;
use clap::Parser;
use search_sync::{AdminConfig, AdminError, Cli, Dependencies};
use std::io;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_sync=info,search_sync_repository=info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init();

        info!(
            service_name = "search-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        // Logs go to stderr so command output stays machine readable
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr)
                    .pretty(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), AdminError> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AdminConfig::from_env();
    init_tracing(config.json_logs);

    let command = Cli::parse().command;

    let deps = match Dependencies::new(config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let mut stdout = io::stdout().lock();
    match command.run(&deps, &mut stdout).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, command = ?command, "Command failed");
            Err(e)
        }
    }
}
