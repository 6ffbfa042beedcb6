//! Error types for the WhatsApp bot API.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Both 'to' and 'message' are required")]
    MissingField,

    #[error("Twilio credentials not set")]
    TwilioNotConfigured,

    #[error("Failed to send message: {0}")]
    SendFailed(#[from] twilio_client::TwilioError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: String,
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            BotError::MissingField => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            BotError::TwilioNotConfigured => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TWILIO_NOT_CONFIGURED")
            }
            BotError::SendFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SEND_FAILED"),
            BotError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            BotError::InvalidBody { status, .. } => (*status, "INVALID_BODY"),
        };

        let body = ErrorResponse {
            detail: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BotError {
    fn from(rejection: JsonRejection) -> Self {
        BotError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<FormRejection> for BotError {
    fn from(rejection: FormRejection) -> Self {
        BotError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
