//! HTTP surface
//!
//! Axum router exposing the batch endpoint, the diagnostic passthrough and
//! the liveness check.

pub mod handlers;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::infrastructure::config::ServerConfig;
pub use routes::build_routes;
pub use state::AppState;

pub async fn listen(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

    info!("🛰️ Listening on http://{}", listener.local_addr().context("Listener has no local address")?);

    axum::serve(listener, build_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received ctrl+c interrupt, closing server"),
        Err(e) => {
            warn!("Unable to listen for ctrl+c, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
