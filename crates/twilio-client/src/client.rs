//! Twilio HTTP client.

use crate::error::TwilioError;
use crate::types::{CreateMessage, SentMessage};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio WhatsApp sandbox sender number.
pub const SANDBOX_NUMBER: &str = "+14155238886";

/// Prefix `number` with `whatsapp:` unless it already carries it.
pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with("whatsapp:") {
        number.to_string()
    } else {
        format!("whatsapp:{}", number)
    }
}

/// Twilio REST API client.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    base_url: String,
    account_sid: String,
    auth_token: SecretString,
    from_number: String,
}

impl TwilioClient {
    pub fn new(
        base_url: impl Into<String>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Result<Self, TwilioError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
            from_number: from_number.into(),
        })
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Sender address, `whatsapp:` prefixed.
    pub fn from_address(&self) -> String {
        whatsapp_address(&self.from_number)
    }

    /// Send a WhatsApp message and return the created message.
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn send_whatsapp(&self, to: &str, body: &str) -> Result<SentMessage, TwilioError> {
        let to = whatsapp_address(to);
        let from = self.from_address();
        debug!(from = %from, to = %to, "Sending WhatsApp message");

        let response = self
            .client
            .post(format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                self.base_url, self.account_sid
            ))
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&CreateMessage {
                to: &to,
                from: &from,
                body,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            warn!("Send failed: {}", msg);
            return Err(TwilioError::SendFailed(msg));
        }

        let sent: SentMessage = response.json().await?;
        debug!(sid = %sent.sid, "Message accepted");
        Ok(sent)
    }
}
