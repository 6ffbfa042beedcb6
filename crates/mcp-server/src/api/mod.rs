//! HTTP surface of the MCP server.

mod handlers;

pub use handlers::*;

use axum::{
    routing::{get, post},
    Router,
};
use mcp::McpService;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: McpService,
}

impl AppState {
    pub fn new(service: McpService) -> Self {
        Self { service }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/mcp", post(handlers::mcp_endpoint))
        // Older clients post to the SSE transport path.
        .route("/sse", post(handlers::mcp_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
