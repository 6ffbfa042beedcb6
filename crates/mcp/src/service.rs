//! Server-side MCP request handler.

use crate::rpc::{OutboundResponse, RpcRequest, INTERNAL_ERROR};
use crate::types::{
    CallToolParams, CallToolResult, ImplementationInfo, InitializeParams, InitializeResult,
    ListToolsResult, McpTool, ServerCapabilities, ToolsCapability,
};
use crate::PROTOCOL_VERSION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tools::{ToolCall, ToolExecutor};
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "financial-advisor-mcp";

/// Dispatches JSON-RPC requests to the tool executor.
#[derive(Clone)]
pub struct McpService {
    executor: Arc<ToolExecutor>,
}

impl McpService {
    pub fn new(executor: Arc<ToolExecutor>) -> Self {
        Self { executor }
    }

    /// Handle a raw request body. `None` means nothing should be sent back.
    pub async fn handle_message(&self, body: &str) -> Option<OutboundResponse> {
        match serde_json::from_str::<RpcRequest>(body) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Unparseable JSON-RPC message");
                Some(OutboundResponse::parse_error(format!("Parse error: {e}")))
            }
        }
    }

    pub async fn handle_request(&self, request: RpcRequest) -> Option<OutboundResponse> {
        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "Unsupported jsonrpc version");
            return Some(OutboundResponse::invalid_request(
                request.id,
                "Unsupported jsonrpc version (expected 2.0)",
            ));
        }

        let RpcRequest {
            method, params, id, ..
        } = request;
        debug!(method = %method, "MCP request");

        match method.as_str() {
            "initialize" => Some(self.handle_initialize(id, params)),
            "tools/list" => Some(self.handle_list_tools(id)),
            "tools/call" => Some(self.handle_call_tool(id, params).await),
            "ping" => Some(OutboundResponse::success(id, json!({}))),
            method if method.starts_with("notifications/") => {
                info!(method = %method, "Client notification");
                None
            }
            other => Some(OutboundResponse::method_not_found(id, other)),
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: InitializeParams = match parse_params(params.or_else(|| Some(json!({})))) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        info!(
            client = %parsed.client_info.name,
            version = parsed.client_info.version.as_deref().unwrap_or("unknown"),
            "Client initialized"
        );

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ImplementationInfo {
                name: SERVER_NAME.to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
        };

        success(id, &result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> OutboundResponse {
        let tools = self
            .executor
            .registry()
            .get_definitions()
            .into_iter()
            .map(McpTool::from)
            .collect();

        success(
            id,
            &ListToolsResult {
                tools,
                next_cursor: None,
            },
        )
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> OutboundResponse {
        let parsed: CallToolParams = match parse_params(params) {
            Ok(value) => value,
            Err(message) => return OutboundResponse::invalid_params(id, message),
        };

        let arguments = parsed.arguments.unwrap_or_else(|| json!({}));
        let call_id = id
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_else(|| "mcp".to_string());
        let call = ToolCall::new(call_id, parsed.name, arguments.to_string());

        let result = self.executor.execute(&call).await;
        success(id, &CallToolResult::text(result.content, !result.success))
    }
}

fn success<T: Serialize>(id: Option<Value>, payload: &T) -> OutboundResponse {
    match serde_json::to_value(payload) {
        Ok(value) => OutboundResponse::success(id, value),
        Err(e) => OutboundResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}")),
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, String> {
    serde_json::from_value(params.unwrap_or(Value::Null)).map_err(|err| err.to_string())
}
