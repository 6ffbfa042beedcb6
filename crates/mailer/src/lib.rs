//! Outbound email over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host (implicit TLS)
    #[serde(default = "default_host")]
    pub host: String,

    /// SMTP relay port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Sender address, also used as the login user
    #[serde(default)]
    pub sender_email: Option<String>,

    /// App password for the sender account
    #[serde(default)]
    pub app_password: Option<SecretString>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sender_email: None,
            app_password: None,
        }
    }
}

fn default_host() -> String {
    "smtp.gmail.com".into()
}

fn default_port() -> u16 {
    465
}

/// Anything that can deliver a plain-text email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, receiver: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

/// Email sender backed by an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from config.
    ///
    /// Returns `Ok(None)` when the sender address or app password is
    /// missing or blank.
    pub fn from_config(config: &SmtpConfig) -> Result<Option<Self>, MailerError> {
        let sender_email = config
            .sender_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let app_password = config
            .app_password
            .as_ref()
            .filter(|p| !p.expose_secret().trim().is_empty());

        let (Some(sender_email), Some(app_password)) = (sender_email, app_password) else {
            return Ok(None);
        };

        let sender: Mailbox = sender_email.parse()?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                sender_email.to_string(),
                app_password.expose_secret().to_string(),
            ))
            .build();

        info!(host = %config.host, port = config.port, sender = %sender, "SMTP mailer configured");

        Ok(Some(Self { transport, sender }))
    }

    fn build_message(&self, receiver: &str, subject: &str, body: &str) -> Result<Message, MailerError> {
        Ok(Message::builder()
            .from(self.sender.clone())
            .to(receiver.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?)
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    async fn send(&self, receiver: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        let message = self.build_message(receiver, subject, body)?;
        self.transport.send(message).await?;
        info!("Email sent");
        Ok(())
    }
}
