//! pulse-server - Residency Pulse submission service
//!
//! Captures contributor pulses over HTTP, persists them in the configured
//! store, and serves the admin list, delete, export, and review endpoints.

use anyhow::{Context, Result};
use clap::Parser;
use pulse_common::config::TomlConfig;
use pulse_common::store::{open_store, select_backend};
use pulse_server::settings::{Args, Settings};
use pulse_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Residency Pulse (pulse-server) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let toml = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration file")?;
    let settings = Settings::resolve(args, toml)?;

    info!("Roster: {} contributors", settings.roster.names().len());
    if settings.admin_password.is_none() {
        warn!("No admin password configured; admin endpoints will answer 503");
    }

    let store = match open_store(select_backend(&settings.backend)).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open submission store: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(store, settings.roster, settings.admin_password.as_deref());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    info!("pulse-server listening on http://{}", settings.bind);
    info!("Health check: http://{}/health", settings.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
