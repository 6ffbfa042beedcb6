//! Connection to the upstream MCP server.

use mcp::{McpClient, McpError, McpTool};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// The MCP server and the tools discovered on it.
///
/// Tools are discovered once; until a connection succeeds the gateway
/// reports itself as disconnected.
pub struct Upstream {
    client: McpClient,
    tools: RwLock<Option<Vec<McpTool>>>,
}

impl Upstream {
    pub fn new(client: McpClient) -> Self {
        Self {
            client,
            tools: RwLock::new(None),
        }
    }

    /// Initialize the session and cache the tool list.
    pub async fn connect(&self) -> Result<usize, McpError> {
        self.client.initialize().await?;
        let tools = self.client.list_tools().await?;
        let count = tools.len();

        *self.tools.write().await = Some(tools);
        Ok(count)
    }

    /// Try to connect up to `attempts` times, waiting `retry_delay * attempt`
    /// after each failure. Returns whether a connection was made.
    pub async fn connect_with_retry(&self, attempts: u32, retry_delay: Duration) -> bool {
        for attempt in 1..=attempts {
            info!(
                endpoint = %self.client.endpoint(),
                "Connecting to MCP server (attempt {}/{})",
                attempt,
                attempts
            );

            match self.connect().await {
                Ok(count) => {
                    info!("Connected to MCP server. Found {} tools.", count);
                    return true;
                }
                Err(e) => {
                    error!(error = %e, "Error connecting to MCP server");
                    if attempt < attempts {
                        let wait = retry_delay * attempt;
                        warn!(?wait, "Retrying");
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        error!("Failed to connect after {} attempts", attempts);
        false
    }

    pub async fn is_connected(&self) -> bool {
        self.tools.read().await.is_some()
    }

    /// Cached tools, or `None` when disconnected.
    pub async fn tools(&self) -> Option<Vec<McpTool>> {
        self.tools.read().await.clone()
    }

    pub async fn has_tool(&self, name: &str) -> bool {
        self.tools
            .read()
            .await
            .as_ref()
            .is_some_and(|tools| tools.iter().any(|t| t.name == name))
    }

    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, McpError> {
        self.client.call_tool(name, arguments).await
    }
}
