//! HTTP request handlers.

use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub server: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        server: mcp::SERVER_NAME.to_string(),
    })
}

/// JSON-RPC endpoint. Notifications are acknowledged with 202 and no body.
pub async fn mcp_endpoint(State(state): State<AppState>, body: String) -> Response {
    match state.service.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
