//! HTTP client for a remote MCP server.

use crate::error::McpError;
use crate::rpc::{OutboundResponse, RpcRequest};
use crate::types::{
    CallToolParams, CallToolResult, ImplementationInfo, InitializeParams, InitializeResult,
    ListToolsResult, McpTool,
};
use crate::PROTOCOL_VERSION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, instrument};

/// JSON-RPC client posting to `{base_url}/mcp`.
pub struct McpClient {
    client: Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl McpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, McpError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into();

        Ok(Self {
            client,
            endpoint: format!("{}/mcp", base_url.trim_end_matches('/')),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run the initialize handshake and confirm it with a notification.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn initialize(&self) -> Result<InitializeResult, McpError> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: ImplementationInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
        };

        let result: InitializeResult = self
            .request("initialize", Some(serde_json::to_value(params)?))
            .await?;
        self.notify("notifications/initialized").await?;

        debug!(server = %result.server_info.name, "MCP session initialized");
        Ok(result)
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let result: ListToolsResult = self.request("tools/list", None).await?;
        Ok(result.tools)
    }

    /// Call a tool and return the text of its first content item.
    #[instrument(skip(self, arguments), fields(endpoint = %self.endpoint))]
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<String, McpError> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments: Some(arguments),
        };

        let result: CallToolResult = self
            .request("tools/call", Some(serde_json::to_value(params)?))
            .await?;

        let text = result.first_text().ok_or(McpError::EmptyResult)?;
        if result.is_error {
            return Err(McpError::Tool(text.to_string()));
        }
        Ok(text.to_string())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, McpError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RpcRequest::new(id, method, params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: OutboundResponse = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(McpError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = envelope.result.ok_or(McpError::EmptyResult)?;
        Ok(serde_json::from_value(result)?)
    }

    async fn notify(&self, method: &str) -> Result<(), McpError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RpcRequest::notification(method))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(McpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
