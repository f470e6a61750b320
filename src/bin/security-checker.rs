//! Security Checker Server Binary
//!
//! Runs the configured filter pipeline in front of an echo handler. Useful for trying out a
//! pipeline order before wiring the filters into an application router.

use anyhow::Context;
use security_checker::{config::Config, observability::init_observability, server::start_server};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration from file, falling back to defaults
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_file_with_env(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        Err(_) => Config::default_config(),
    };

    init_observability(&config.logging.level, &config.logging.format)
        .context("failed to initialize logging")?;

    info!("Starting Security Checker Server");

    let pipeline = Arc::new(config.build_pipeline()?);
    info!(filters = ?pipeline.names(), "Filter pipeline built");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(&addr, pipeline, shutdown_signal()).await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A signal that cannot be registered is logged and never fires, so the server keeps running
/// on the other one.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
