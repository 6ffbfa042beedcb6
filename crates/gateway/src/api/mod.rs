//! HTTP API of the gateway.

mod handlers;
mod types;

pub use handlers::*;
pub use types::*;

use crate::upstream::Upstream;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    /// Interval between SSE heartbeats
    pub heartbeat: Duration,
}

impl AppState {
    pub fn new(upstream: Upstream) -> Self {
        Self {
            upstream: Arc::new(upstream),
            heartbeat: Duration::from_secs(5),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/list_tools", get(handlers::list_tools))
        .route("/call_tool", post(handlers::call_tool))
        .route("/sse", get(handlers::sse))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
