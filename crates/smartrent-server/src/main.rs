//! SmartRent server entrypoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use smartrent::MemoryStore;
use tokio::signal;
use tracing::{info, warn};

use smartrent_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    config.init_tracing();

    let store = match &config.data_file {
        Some(path) => {
            let store = MemoryStore::open(path)
                .await
                .with_context(|| format!("failed to load data file {}", path.display()))?;
            info!(path = %path.display(), "Loaded SmartRent data file");
            store
        }
        None => {
            warn!("No data file configured; state will be lost on exit");
            MemoryStore::new()
        }
    };

    let app = build_router(AppState::new(Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(bind = %config.bind, "SmartRent server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("SmartRent server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
