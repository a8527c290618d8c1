//! # Remit Compare
//!
//! Main entry point for the quote comparison service.

use anyhow::Context;
use remit_compare::api::rest::{AppState, create_router};
use remit_compare::bootstrap::build_engine;
use remit_compare::config::{AppConfig, LogConfig, LogFormat};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    match log.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("Shutting down Remit Compare");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config.log);

    info!("Starting Remit Compare v{}", env!("CARGO_PKG_VERSION"));

    let engine = build_engine(&config).context("failed to assemble engine")?;
    let state = Arc::new(AppState {
        engine: Arc::new(engine),
    });
    let router = create_router(state);

    let addr = config.rest.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, sources = config.sources.source_count(), "REST server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
