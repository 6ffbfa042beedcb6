//! MCP server - Entry point.

use anyhow::{Context, Result};
use mcp_server::{
    api::{create_router, AppState},
    build_service, Config,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
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

    info!("Starting Financial Advisor MCP server");

    let service = build_service(&config).await?;
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("MCP endpoint listening on http://{}/mcp", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
