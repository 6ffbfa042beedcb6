//! Tool executor with timeout and error handling.

use crate::registry::ToolRegistry;
use crate::types::{ToolCall, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Executor for running tools with safety limits.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout_secs: u64,
    max_response_len: Option<usize>,
}

impl ToolExecutor {
    /// Create a new executor.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout_secs: 60,
            max_response_len: Some(8000),
        }
    }

    /// Set execution timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set maximum response length in characters.
    pub fn with_max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = Some(len);
        self
    }

    /// Return tool output in full.
    pub fn without_response_limit(mut self) -> Self {
        self.max_response_len = None;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool call.
    pub async fn execute(&self, tool_call: &ToolCall) -> ToolResult {
        let tool_name = &tool_call.function.name;
        info!(tool = %tool_name, "Executing tool");

        let tool = match self.registry.get_tool(tool_name) {
            Some(t) => t,
            None => {
                warn!(tool = %tool_name, "Tool not found or disabled");
                return ToolResult::error(
                    &tool_call.id,
                    format!("Tool '{}' not available", tool_name),
                );
            }
        };

        let result = timeout(
            Duration::from_secs(self.timeout_secs),
            tool.execute(&tool_call.function.arguments),
        )
        .await;

        match result {
            Ok(Ok(content)) => {
                let content = match self.max_response_len {
                    Some(max) => truncate(content, max),
                    None => content,
                };
                info!(tool = %tool_name, len = content.len(), "Tool executed successfully");
                ToolResult::success(&tool_call.id, content)
            }
            Ok(Err(e)) => {
                error!(tool = %tool_name, error = %e, "Tool execution failed");
                ToolResult::error(&tool_call.id, format!("Error: {}", e))
            }
            Err(_) => {
                error!(tool = %tool_name, timeout = self.timeout_secs, "Tool timed out");
                ToolResult::error(
                    &tool_call.id,
                    format!("Tool timed out after {} seconds", self.timeout_secs),
                )
            }
        }
    }
}

/// Cut `content` to at most `max_chars` characters, marking the cut.
fn truncate(content: String, max_chars: usize) -> String {
    let total = content.chars().count();
    if total <= max_chars {
        return content;
    }

    let kept: String = content.chars().take(max_chars).collect();
    format!("{}... [truncated, {} chars total]", kept, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::types::{Tool, ToolDefinition};
    use async_trait::async_trait;

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function("slow", "Slow tool", serde_json::json!({}))
        }

        fn name(&self) -> &str {
            "slow"
        }

        async fn execute(&self, _arguments: &str) -> Result<String, ToolError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("done".into())
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::function("echo", "Echo tool", serde_json::json!({}))
        }

        fn name(&self) -> &str {
            "echo"
        }

        async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
            if arguments == "fail" {
                return Err(ToolError::InvalidArguments("fail".into()));
            }
            Ok(arguments.to_string())
        }
    }

    fn executor_with(tool: Arc<dyn Tool>) -> ToolExecutor {
        let mut registry = ToolRegistry::new();
        registry.register(tool);
        ToolExecutor::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_execute_success() {
        let executor = executor_with(Arc::new(EchoTool));
        let result = executor.execute(&ToolCall::new("call-1", "echo", "hello")).await;

        assert!(result.success);
        assert_eq!(result.tool_call_id, "call-1");
        assert_eq!(result.content, "hello");
    }

    #[tokio::test]
    async fn test_execute_error() {
        let executor = executor_with(Arc::new(EchoTool));
        let result = executor.execute(&ToolCall::new("call-1", "echo", "fail")).await;

        assert!(!result.success);
        assert_eq!(result.content, "Error: Invalid arguments: fail");
    }

    #[tokio::test]
    async fn test_execute_timeout() {
        let executor = executor_with(Arc::new(SlowTool)).with_timeout(1);
        let result = executor.execute(&ToolCall::new("call-1", "slow", "{}")).await;

        assert!(!result.success);
        assert!(result.content.contains("timed out"));
    }

    #[tokio::test]
    async fn test_execute_tool_not_found() {
        let executor = ToolExecutor::new(Arc::new(ToolRegistry::new()));
        let result = executor
            .execute(&ToolCall::new("call-1", "nonexistent", "{}"))
            .await;

        assert!(!result.success);
        assert_eq!(result.content, "Tool 'nonexistent' not available");
    }

    #[tokio::test]
    async fn test_truncates_on_char_boundary() {
        let executor = executor_with(Arc::new(EchoTool)).with_max_response_len(3);
        let result = executor.execute(&ToolCall::new("call-1", "echo", "ééééé")).await;

        assert!(result.success);
        assert_eq!(result.content, "ééé... [truncated, 5 chars total]");
    }

    #[tokio::test]
    async fn test_unlimited_response_is_kept_whole() {
        let long = "x".repeat(9000);
        let executor = executor_with(Arc::new(EchoTool))
            .with_max_response_len(3)
            .without_response_limit();
        let result = executor.execute(&ToolCall::new("call-1", "echo", &long)).await;

        assert!(result.success);
        assert_eq!(result.content, long);
    }

    #[test]
    fn test_truncate_short_content_untouched() {
        assert_eq!(truncate("abc".into(), 3), "abc");
    }
}
