use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use stockalpha_backend::app;
use stockalpha_backend::config::AppConfig;
use stockalpha_backend::external::iex::IexProvider;
use stockalpha_backend::logging::init_logging;
use stockalpha_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;

    // Initialize logging FIRST
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    if config.upstream.token.is_none() {
        error!("IEX_AUTH_TOKEN is not set, every /api request will fail with 500");
    }

    let provider = IexProvider::new(&config.upstream).context("failed to build upstream client")?;
    info!(base_url = %config.upstream.base_url, timeout = ?config.upstream.timeout, "📊 Using IEX Cloud price provider");

    let state = AppState::new(Arc::new(provider));
    let app = app::create_app(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    info!("🚀 Stock alpha backend running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
