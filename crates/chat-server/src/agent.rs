//! Function-calling loop over the gateway's tools.

use crate::config::{AgentConfig, GatewayConfig};
use gateway::GatewayClient;
use openai_client::{
    FunctionDefinitionApi, Message, OpenAiClient, OpenAiError, ToolCall,
    ToolDefinition as ModelToolDefinition,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const SYSTEM_PROMPT: &str = "You are RightNow, an AI financial advisor specialized in analyzing \
retail transaction data from Jordan malls. You provide real-time insights, trend analysis, and \
actionable recommendations based on financial data.";

pub const OFFLINE_PROMPT: &str = " IMPORTANT: The MCP server that provides financial data is \
currently offline. Inform the user that they need to start the MCP server to access data \
analysis features. Do not attempt to provide specific financial insights without the server \
connection.";

/// Offered in place of the real tools when they cannot be listed.
pub const OFFLINE_TOOL: &str = "notify_server_offline";

/// Answers a conversation, calling gateway tools as the model requests.
#[derive(Clone)]
pub struct ChatAgent {
    llm: Arc<OpenAiClient>,
    gateway: GatewayClient,
    gateway_config: GatewayConfig,
    config: AgentConfig,
}

impl ChatAgent {
    pub fn new(
        llm: Arc<OpenAiClient>,
        gateway: GatewayClient,
        gateway_config: GatewayConfig,
        config: AgentConfig,
    ) -> Self {
        Self {
            llm,
            gateway,
            gateway_config,
            config,
        }
    }

    /// Produce the assistant's reply to `history`.
    ///
    /// The model gets up to `max_turns` rounds to request tools; after that
    /// it is asked once more without tools.
    #[instrument(skip(self, history), fields(history_len = history.len()))]
    pub async fn respond(&self, history: Vec<Message>) -> Result<String, OpenAiError> {
        let available = self.gateway_available().await;

        let mut system_prompt = SYSTEM_PROMPT.to_string();
        if !available {
            warn!("Tool gateway unavailable");
            system_prompt.push_str(OFFLINE_PROMPT);
        }

        let tools = if available { self.tools().await } else { Vec::new() };

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend(history);

        for round in 0..self.config.max_turns {
            let reply = self
                .llm
                .chat_with_tools(&messages, Some(self.config.temperature), None, Some(&tools))
                .await?;

            let Some(calls) = reply.requested_tool_calls().map(<[ToolCall]>::to_vec) else {
                return Ok(reply.content.unwrap_or_default());
            };

            debug!(round, calls = calls.len(), "Model requested tools");
            messages.push(Message::assistant_with_tool_calls(reply.content, calls.clone()));

            for call in calls {
                let observation = self.call_tool(&call).await;
                messages.push(Message::tool_result(call.id, observation));
            }
        }

        info!("Tool rounds exhausted, requesting final answer");
        let reply = self
            .llm
            .chat_with_tools(&messages, Some(self.config.temperature), None, None)
            .await?;
        Ok(reply.content.unwrap_or_default())
    }

    async fn gateway_available(&self) -> bool {
        match self.gateway.status(self.gateway_config.status_timeout).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Gateway status check failed");
                false
            }
        }
    }

    /// Gateway tools in the model's format, or the offline notice tool.
    async fn tools(&self) -> Vec<ModelToolDefinition> {
        match self.gateway.list_tools(self.gateway_config.list_timeout).await {
            Ok(tools) => {
                info!(count = tools.len(), "Tools loaded from gateway");
                tools
                    .into_iter()
                    .map(|d| ModelToolDefinition {
                        tool_type: d.tool_type,
                        function: FunctionDefinitionApi {
                            name: d.function.name,
                            description: d.function.description,
                            parameters: d.function.parameters,
                        },
                    })
                    .collect()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch tools");
                vec![ModelToolDefinition::function(
                    OFFLINE_TOOL,
                    "Notify the user that the MCP server is offline",
                    serde_json::json!({"type": "object", "properties": {}, "required": []}),
                )]
            }
        }
    }

    /// Run one tool call through the gateway. Failures become text for the model.
    async fn call_tool(&self, call: &ToolCall) -> String {
        let name = &call.function.name;
        let arguments = serde_json::from_str::<serde_json::Value>(&call.function.arguments)
            .unwrap_or_else(|e| {
                warn!(tool = %name, error = %e, "Unparseable tool arguments");
                serde_json::json!({})
            });

        info!(tool = %name, "Calling tool");
        match self
            .gateway
            .call_tool(name, Some(arguments), self.gateway_config.call_timeout)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool call failed");
                format!(
                    "Error: Unable to call the tool {}. The financial data service is currently \
                     unavailable. Please ensure the MCP server is running.",
                    name
                )
            }
        }
    }
}
