//! Chat server - Entry point.

use anyhow::{Context, Result};
use chat_server::{
    api::{create_router, AppState},
    ChatAgent, Config,
};
use gateway::GatewayClient;
use openai_client::OpenAiClient;
use session_store::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
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

    info!(model = %config.openai.model, gateway = %config.gateway.url, "Starting chat server");

    let llm = OpenAiClient::from_config(&config.openai).context("Failed to create model client")?;
    if llm.health_check().await {
        info!("Model API healthy");
    } else {
        warn!("Model API health check failed - will retry on requests");
    }

    let gateway = GatewayClient::new(&config.gateway.url).context("Failed to create gateway client")?;

    let agent = ChatAgent::new(
        Arc::new(llm),
        gateway,
        config.gateway.clone(),
        config.agent.clone(),
    );
    let sessions = SessionStore::new(config.sessions.max_turns, config.sessions.ttl);

    let app = create_router(AppState { agent, sessions });

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Chat API listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
