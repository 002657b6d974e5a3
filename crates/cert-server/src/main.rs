//! certd - CERT measurement service
//!
//! Serves `/measure/consistency`, `/measure/coordination` and `/health`.
//! Configuration comes from the environment (see `cert_server::config`).

use anyhow::{Context, Result};
use cert_core::{init_tracing, ConsistencyEngine, METRICS};
use cert_server::{router, AppState, ServerConfig};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = ServerConfig::from_env().context("Invalid CERT configuration")?;
    init_tracing(config.log_json, Level::INFO);

    info!(
        service = "certd",
        version = cert_core::VERSION,
        dotenv = dotenv_loaded,
        "Starting CERT measurement service"
    );

    let provider = config.build_provider()?;
    let state = AppState::new(ConsistencyEngine::new(provider));
    let app = router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    METRICS.flush();
    info!("certd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
