//! HTTP API of the WhatsApp bot.

mod handlers;
mod rate_limit;
mod types;

pub use handlers::*;
pub use rate_limit::{limit_webhook, WebhookRateLimit};
pub use types::*;

use crate::config::Config;
use crate::responder::Responder;
use anyhow::{Context, Result};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use gateway::GatewayClient;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use twilio_client::TwilioClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub responder: Responder,
    pub gateway: GatewayClient,
    /// `None` when Twilio credentials are missing
    pub twilio: Option<Arc<TwilioClient>>,
    pub twilio_account_sid: Option<String>,
    pub twilio_phone_number: String,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway =
            GatewayClient::new(&config.gateway.url).context("Failed to create gateway client")?;

        let twilio = match (&config.twilio.account_sid, &config.twilio.auth_token) {
            (Some(sid), Some(token)) => Some(Arc::new(
                TwilioClient::new(
                    &config.twilio.api_base,
                    sid,
                    token.expose_secret().as_str(),
                    &config.twilio.phone_number,
                )
                .context("Failed to create Twilio client")?,
            )),
            _ => None,
        };

        Ok(Self {
            responder: Responder::new(gateway.clone(), config.gateway.timeout),
            gateway,
            twilio,
            twilio_account_sid: config.twilio.account_sid.clone(),
            twilio_phone_number: config.twilio.phone_number.clone(),
        })
    }
}

/// Create the API router with the default webhook rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, WebhookRateLimit::per_minute(60))
}

/// Create the API router. Only the webhook is rate limited.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: WebhookRateLimit) -> Router {
    let webhook = Router::new()
        .route("/webhook", post(handlers::webhook))
        .route_layer(axum_middleware::from_fn_with_state(rate_limit, limit_webhook));

    Router::new()
        .merge(webhook)
        .route("/send_message", post(handlers::send_message))
        .route("/status", get(handlers::status))
        .route("/send_test_message/:phone", get(handlers::send_test_message))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
