//! Error types for the chat API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openai_client::OpenAiError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid request. {0}")]
    InvalidRequest(String),

    #[error("Invalid request. {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Model error: {0}")]
    Model(#[from] OpenAiError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ChatError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ChatError::InvalidBody { status, .. } => (*status, self.to_string()),
            ChatError::SessionNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ChatError::Model(e) => {
                error!(error = %e, "Chat completion failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unable to connect to the AI service. Please check your OpenAI API key and try again."
                        .to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for ChatError {
    fn from(rejection: JsonRejection) -> Self {
        ChatError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
