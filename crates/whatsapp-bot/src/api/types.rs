//! Request and response bodies.

use gateway::GatewayStatus;
use serde::{Deserialize, Serialize};

/// Fields of a Twilio incoming-message webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub status: String,
    pub message_sid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub twilio_configured: bool,
    pub twilio_account_sid: Option<String>,
    pub twilio_phone_number: String,
    pub mcp_api_url: String,
    /// `connected`, `error` (non-2xx) or `failed` (unreachable)
    pub mcp_connection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_status: Option<GatewayStatus>,
}
