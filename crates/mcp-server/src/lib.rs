//! MCP server for the financial advisor tools.
//!
//! Loads the transaction dataset, registers the advisor tools and serves
//! them as JSON-RPC over HTTP.

pub mod api;
pub mod config;

pub use config::Config;

use anyhow::{Context, Result};
use mailer::{EmailSender, SmtpMailer};
use mcp::McpService;
use openai_client::OpenAiClient;
use std::sync::Arc;
use tools::builtin::register_advisor_tools;
use tools::{Analyst, ToolExecutor, ToolRegistry};
use tracing::{info, warn};
use transactions::TransactionSet;

/// Build the MCP service from configuration.
pub async fn build_service(config: &Config) -> Result<McpService> {
    let data = TransactionSet::load(&config.data.path).with_context(|| {
        format!(
            "Failed to load transaction data from {}",
            config.data.path.display()
        )
    })?;

    let client = OpenAiClient::from_config(&config.openai).context("Failed to create model client")?;
    if client.health_check().await {
        info!(model = %client.model(), "Model API healthy");
    } else {
        warn!(model = %client.model(), "Model API health check failed - will retry on requests");
    }

    let analyst = Arc::new(Analyst::new(Arc::new(client), Arc::new(data)));

    let mailer: Option<Arc<dyn EmailSender>> = match SmtpMailer::from_config(&config.email)
        .context("Invalid email configuration")?
    {
        Some(m) => Some(Arc::new(m)),
        None => {
            warn!("Sender email or app password not set; send_email will report an error");
            None
        }
    };

    Ok(service_from_parts(analyst, mailer, &config.tools))
}

/// Assemble registry, executor and service around an analyst.
pub fn service_from_parts(
    analyst: Arc<Analyst>,
    mailer: Option<Arc<dyn EmailSender>>,
    tools_config: &config::ToolsConfig,
) -> McpService {
    let mut registry = ToolRegistry::new();
    register_advisor_tools(&mut registry, analyst, mailer);
    if !tools_config.email_enabled {
        registry.disable("send_email");
    }
    info!(tools = ?registry.list_enabled(), "Registered {} tools", registry.enabled_count());

    let executor = ToolExecutor::new(Arc::new(registry)).with_timeout(tools_config.timeout.as_secs());
    let executor = match tools_config.max_response_len {
        Some(len) => executor.with_max_response_len(len),
        None => executor.without_response_limit(),
    };

    McpService::new(Arc::new(executor))
}
