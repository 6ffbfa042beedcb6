//! Gateway - Entry point.

use anyhow::{Context, Result};
use gateway::{
    api::{create_router, AppState},
    Config, Upstream,
};
use mcp::McpClient;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(mcp_url = %config.mcp.url, "Starting MCP gateway");

    let client = McpClient::new(&config.mcp.url, config.mcp.timeout)
        .context("Failed to create MCP client")?;
    let upstream = Upstream::new(client);

    if !upstream
        .connect_with_retry(config.mcp.connect_attempts, config.mcp.retry_delay)
        .await
    {
        error!("Please make sure the MCP server is running at {}", config.mcp.url);
    }

    let app = create_router(AppState::new(upstream));

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
