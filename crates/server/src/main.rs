//! Recommendation service binary.
//!
//! Loads the vocabulary and the model at startup, then serves the HTTP
//! routes until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{Config, ServiceOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Codeforces recommendation server");

    // Startup failures are fatal: no vocabulary or no model, no service
    let orchestrator = ServiceOrchestrator::from_config(&config)
        .await
        .context("Initializing recommendation pipeline")?;
    info!("Pipeline ready");

    let app = server::router(Arc::new(orchestrator));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
