//! Configuration for the chat server.

use anyhow::{Context, Result};
use openai_client::OpenAiConfig;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Model configuration
    pub openai: OpenAiConfig,

    /// Tool gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Function-calling loop
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chat sessions
    #[serde(default)]
    pub sessions: SessionConfig,

    /// HTTP server
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Timeout for the availability probe
    #[serde(default = "default_status_timeout", with = "humantime_serde")]
    pub status_timeout: Duration,

    /// Timeout for fetching the tool list
    #[serde(default = "default_list_timeout", with = "humantime_serde")]
    pub list_timeout: Duration,

    /// Timeout for a single tool call
    #[serde(default = "default_call_timeout", with = "humantime_serde")]
    pub call_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Model rounds that may request tools before the final answer
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Turns kept per session
    #[serde(default = "default_session_turns")]
    pub max_turns: usize,

    /// Idle time before a session expires
    #[serde(default = "default_session_ttl", with = "humantime_serde")]
    pub ttl: Duration,
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

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            status_timeout: default_status_timeout(),
            list_timeout: default_list_timeout(),
            call_timeout: default_call_timeout(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            temperature: default_temperature(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns: default_session_turns(),
            ttl: default_session_ttl(),
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

fn default_gateway_url() -> String {
    "http://localhost:8001".into()
}

fn default_status_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_list_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_call_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_turns() -> usize {
    3
}

fn default_temperature() -> f32 {
    0.7
}

fn default_session_turns() -> usize {
    20
}

fn default_session_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
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
