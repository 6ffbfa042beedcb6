//! WhatsApp bot - Entry point.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsapp_bot::{
    api::{create_router_with_rate_limit, AppState, WebhookRateLimit},
    responder::ONLINE_NOTICE,
    setup::sandbox_instructions,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(gateway = %config.gateway.url, "Starting WhatsApp bot");

    info!(
        account_sid = config.twilio.account_sid.as_deref().unwrap_or("NOT CONFIGURED"),
        auth_token = if config.twilio.auth_token.is_some() { "configured" } else { "NOT CONFIGURED" },
        sender = %config.twilio.phone_number,
        "Twilio configuration"
    );
    if !config.twilio.is_configured() {
        warn!("Twilio credentials not set. WhatsApp messaging will not work.");
    }

    for step in sandbox_instructions().iter().take(3) {
        info!("{}", step);
    }
    match &config.whatsapp.public_url {
        Some(url) => info!(
            "Set the sandbox webhook (WHEN A MESSAGE COMES IN) to {}/webhook",
            url.trim_end_matches('/')
        ),
        None => info!("Set the sandbox webhook to <your public URL>/webhook (WHATSAPP__PUBLIC_URL)"),
    }

    let state = AppState::from_config(&config)?;

    if let (Some(number), Some(twilio)) = (&config.whatsapp.test_number, &state.twilio) {
        info!(to = %number, "Sending startup message");
        match twilio.send_whatsapp(number, ONLINE_NOTICE).await {
            Ok(sent) => info!(sid = %sent.sid, "Startup message sent"),
            Err(e) => {
                error!(error = %e, "Failed to send startup message");
                warn!("Make sure you've joined the WhatsApp sandbox and the auth token is correct");
            }
        }
    }

    let app = create_router_with_rate_limit(state, WebhookRateLimit::per_minute(config.rate_limit.per_minute));

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("WhatsApp webhook listening on http://{}/webhook", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
