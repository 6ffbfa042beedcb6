//! Error types for the gateway API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("MCP server is not connected")]
    NotConnected,

    #[error("Tool name is required")]
    MissingToolName,

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Error calling tool: {0}")]
    ToolCall(String),

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            GatewayError::NotConnected => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONNECTED"),
            GatewayError::MissingToolName => (StatusCode::BAD_REQUEST, "MISSING_TOOL_NAME"),
            GatewayError::UnknownTool(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TOOL"),
            GatewayError::ToolCall(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TOOL_CALL_FAILED"),
            GatewayError::InvalidBody { status, .. } => (*status, "INVALID_BODY"),
        };

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<mcp::McpError> for GatewayError {
    fn from(e: mcp::McpError) -> Self {
        match e {
            mcp::McpError::Tool(message) => GatewayError::ToolCall(message),
            other => GatewayError::ToolCall(other.to_string()),
        }
    }
}
