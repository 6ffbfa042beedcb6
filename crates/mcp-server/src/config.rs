//! Configuration for the MCP server.

use anyhow::{Context, Result};
use mailer::SmtpConfig;
use openai_client::OpenAiConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Model configuration
    pub openai: OpenAiConfig,

    /// Transaction dataset
    #[serde(default)]
    pub data: DataConfig,

    /// Outbound email
    #[serde(default)]
    pub email: SmtpConfig,

    /// Tool execution limits
    #[serde(default)]
    pub tools: ToolsConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// CSV file with the transactions
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Per-call timeout
    #[serde(default = "default_tool_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Longest tool output, in characters. Unset keeps answers whole.
    #[serde(default)]
    pub max_response_len: Option<usize>,

    /// Publish the send_email tool
    #[serde(default = "default_true")]
    pub email_enabled: bool,
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

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout: default_tool_timeout(),
            max_response_len: None,
            email_enabled: default_true(),
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

fn default_data_path() -> PathBuf {
    PathBuf::from("data/jordan_transactions.csv")
}

fn default_tool_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".into()
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
