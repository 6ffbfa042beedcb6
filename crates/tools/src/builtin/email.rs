//! Email sending tool.

use crate::error::ToolError;
use crate::types::{Tool, ToolDefinition};
use async_trait::async_trait;
use mailer::EmailSender;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const SENT: &str = "✅ Email sent successfully! write the inform to confirm";
const NOT_CONFIGURED: &str =
    "❌ Error: Sender email or app password not found in environment variables.";

/// Sends a plain-text email. Delivery failures are reported as text so the
/// model can relay them.
pub struct SendEmailTool {
    sender: Option<Arc<dyn EmailSender>>,
}

#[derive(Deserialize)]
struct EmailArgs {
    receiver: String,
    subject: String,
    body: String,
}

impl SendEmailTool {
    pub fn new(sender: Option<Arc<dyn EmailSender>>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Tool for SendEmailTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            "send_email",
            "Send an email to a given recipient with a subject and message",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "receiver": {
                        "type": "string",
                        "description": "Recipient email address"
                    },
                    "subject": {
                        "type": "string",
                        "description": "Email subject line"
                    },
                    "body": {
                        "type": "string",
                        "description": "Plain-text message body"
                    }
                },
                "required": ["receiver", "subject", "body"]
            }),
        )
    }

    fn name(&self) -> &str {
        "send_email"
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: EmailArgs = serde_json::from_str(arguments)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        let Some(sender) = &self.sender else {
            warn!("Email requested but no sender is configured");
            return Ok(NOT_CONFIGURED.to_string());
        };

        match sender.send(&args.receiver, &args.subject, &args.body).await {
            Ok(()) => Ok(SENT.to_string()),
            Err(e) => {
                warn!(error = %e, "Email delivery failed");
                Ok(format!("❌ Error sending email: {}", e))
            }
        }
    }
}
