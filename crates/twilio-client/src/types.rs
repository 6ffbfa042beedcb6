//! Twilio API types.

use serde::{Deserialize, Serialize};

/// Form body for the Messages resource.
#[derive(Debug, Serialize)]
pub(crate) struct CreateMessage<'a> {
    #[serde(rename = "To")]
    pub to: &'a str,
    #[serde(rename = "From")]
    pub from: &'a str,
    #[serde(rename = "Body")]
    pub body: &'a str,
}

/// The created message as returned by Twilio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
}
