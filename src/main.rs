// SPDX-License-Identifier: GPL-3.0-only
mod api;
mod config;
mod downloader;
mod extractor;
mod gameinfo;
mod ledger;
mod logging;
mod mod_installer;
mod utils;

#[cfg(test)]
mod test_helpers;

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use api::HttpServer;
use config::Config;
use downloader::GameBananaClient;
use ledger::{JsonLedger, Ledger};
use logging::setup_logging;
use mod_installer::ModInstallationService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    setup_logging(&config.log_level, config.log_format)?;

    info!("Starting DeadlockModDaemon v{}", env!("CARGO_PKG_VERSION"));
    info!(game_dir = %config.game_dir.display(), addons = %config.addons_dir().display(), "Using game installation");

    if !config.game_dir.is_dir() {
        warn!(game_dir = %config.game_dir.display(), "Game directory does not exist; installs will fail until it does");
    }

    let download_dir = config.download_dir();
    tokio::fs::create_dir_all(&download_dir)
        .await
        .with_context(|| format!("Failed to create download directory '{}'", download_dir.display()))?;

    let ledger: Arc<dyn Ledger> = Arc::new(JsonLedger::new());
    info!(path = %config.ledger_path().display(), "Install ledger");

    let catalog = GameBananaClient::new(config.gamebanana_api_url.clone(), config.gamebanana_game_id)?;
    let installer = Arc::new(ModInstallationService::new(&config, ledger, catalog));

    // Start HTTP server
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let http_server = HttpServer::new(installer, config.local_api_bind);
    let http_task = tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = http_server.serve(shutdown).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("All services started. Waiting for shutdown signal...");

    // Wait for shutdown signal
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
        }
    }

    // Graceful shutdown
    info!("Initiating graceful shutdown...");
    let _ = shutdown_tx.send(());

    if tokio::time::timeout(tokio::time::Duration::from_secs(5), http_task).await.is_err() {
        warn!("HTTP server did not stop in time");
    }

    info!("Shutdown complete");
    Ok(())
}
