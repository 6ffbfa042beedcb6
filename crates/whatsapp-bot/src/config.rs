//! Configuration for the WhatsApp bot.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Twilio account
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Tool gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Startup behavior
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Webhook rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: Option<String>,

    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// WhatsApp sender number
    #[serde(default = "default_phone_number")]
    pub phone_number: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Timeout for a tool call
    #[serde(default = "default_gateway_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhatsAppConfig {
    /// Number greeted on startup
    #[serde(default)]
    pub test_number: Option<String>,

    /// Public base URL Twilio reaches this server at
    #[serde(default)]
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Webhook requests allowed per minute
    #[serde(default = "default_per_minute")]
    pub per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            phone_number: default_phone_number(),
            api_base: default_api_base(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            timeout: default_gateway_timeout(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: default_per_minute(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_phone_number() -> String {
    twilio_client::SANDBOX_NUMBER.into()
}

fn default_api_base() -> String {
    twilio_client::DEFAULT_API_BASE.into()
}

fn default_gateway_url() -> String {
    "http://localhost:8001".into()
}

fn default_gateway_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_per_minute() -> u32 {
    60
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8002
}

fn default_log_level() -> String {
    "info".into()
}

impl TwilioConfig {
    pub fn is_configured(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
