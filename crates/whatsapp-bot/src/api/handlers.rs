//! HTTP request handlers.

use super::types::*;
use super::AppState;
use crate::error::BotError;
use crate::responder::GREETING;
use crate::twiml;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Path, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use gateway::GatewayClientError;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

const STATUS_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Twilio incoming-message webhook. Replies with TwiML.
pub async fn webhook(
    State(state): State<AppState>,
    payload: Result<Form<WebhookForm>, FormRejection>,
) -> Result<Response, BotError> {
    let Form(form) = payload?;
    info!(from = %form.from, message = %form.body, "Incoming WhatsApp message");

    let reply = state.responder.respond(&form.body).await;
    info!(reply_len = reply.len(), "Replying via TwiML");

    Ok((
        [(header::CONTENT_TYPE, "application/xml")],
        twiml::message_response(&reply),
    )
        .into_response())
}

/// Send a WhatsApp message on behalf of a dashboard.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BotError> {
    let Json(request) = payload?;
    let (Some(to), Some(message)) = (
        request.to.filter(|s| !s.is_empty()),
        request.message.filter(|s| !s.is_empty()),
    ) else {
        return Err(BotError::MissingField);
    };

    let twilio = state.twilio.as_ref().ok_or(BotError::TwilioNotConfigured)?;
    let sent = twilio.send_whatsapp(&to, &message).await?;

    Ok(Json(SendMessageResponse {
        status: "success".to_string(),
        message_sid: sent.sid,
    }))
}

/// Twilio configuration and gateway connectivity.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let (mcp_connection, mcp_status) = match state.gateway.status(STATUS_PROBE_TIMEOUT).await {
        Ok(status) => ("connected", Some(status)),
        Err(GatewayClientError::Status { .. }) => ("error", None),
        Err(_) => ("failed", None),
    };

    Json(StatusResponse {
        twilio_configured: state.twilio.is_some(),
        twilio_account_sid: state.twilio_account_sid.clone(),
        twilio_phone_number: state.twilio_phone_number.clone(),
        mcp_api_url: state.gateway.base_url().to_string(),
        mcp_connection: mcp_connection.to_string(),
        mcp_status,
    })
}

/// Send the greeting to `phone`.
pub async fn send_test_message(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Json<Value> {
    let Some(twilio) = state.twilio.as_ref() else {
        return Json(json!({"status": "error", "message": BotError::TwilioNotConfigured.to_string()}));
    };

    match twilio.send_whatsapp(&phone, GREETING).await {
        Ok(sent) => Json(json!({"status": "success", "details": sent})),
        Err(e) => {
            error!(error = %e, "Test message failed");
            Json(json!({"status": "error", "message": e.to_string()}))
        }
    }
}
