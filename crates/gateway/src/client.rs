//! Client for the gateway's HTTP API.

use crate::api::{CallToolRequest, ListToolsResponse, StatusResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tools::ToolDefinition;
use tracing::{debug, instrument};

pub type GatewayStatus = StatusResponse;

#[derive(Error, Debug)]
pub enum GatewayClientError {
    #[error("Request timed out")]
    Timeout,

    #[error("Could not connect to gateway: {0}")]
    Connect(String),

    #[error("Gateway returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response has no result")]
    MissingResult,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GatewayClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayClientError::Timeout
        } else if e.is_connect() {
            GatewayClientError::Connect(e.to_string())
        } else {
            GatewayClientError::Http(e)
        }
    }
}

/// HTTP client for `/status`, `/list_tools` and `/call_tool`.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gateway connection status.
    #[instrument(skip(self))]
    pub async fn status(&self, timeout: Duration) -> Result<GatewayStatus, GatewayClientError> {
        let response = self
            .client
            .get(format!("{}/status", self.base_url))
            .timeout(timeout)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Tools in the function-calling format.
    #[instrument(skip(self))]
    pub async fn list_tools(&self, timeout: Duration) -> Result<Vec<ToolDefinition>, GatewayClientError> {
        let response = self
            .client
            .get(format!("{}/list_tools", self.base_url))
            .timeout(timeout)
            .send()
            .await?;
        let body: ListToolsResponse = Self::parse(response).await?;
        Ok(body.tools)
    }

    /// Call a tool and return its text result.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Option<serde_json::Value>,
        timeout: Duration,
    ) -> Result<String, GatewayClientError> {
        let request = CallToolRequest {
            tool_name: Some(tool_name.to_string()),
            arguments,
        };

        let response = self
            .client
            .post(format!("{}/call_tool", self.base_url))
            .timeout(timeout)
            .json(&request)
            .send()
            .await?;

        let body: serde_json::Value = Self::parse(response).await?;
        let result = body
            .get("result")
            .ok_or(GatewayClientError::MissingResult)?;

        debug!("Tool call returned");
        Ok(match result {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "connected", "tools_count": 5})),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let status = client.status(TIMEOUT).await.unwrap();
        assert_eq!(status.tools_count, 5);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = MockServer::start().await;
        Mock::given(path("/list_tools"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tools": [{
                "type": "function",
                "function": {"name": "get_mall_summary", "description": "d", "parameters": {"type": "object"}}
            }]})))
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let tools = client.list_tools(TIMEOUT).await.unwrap();
        assert_eq!(tools[0].function.name, "get_mall_summary");
    }

    #[tokio::test]
    async fn test_call_tool() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/call_tool"))
            .and(body_json(json!({"tool_name": "generate_monthly_report", "arguments": {"month": "May"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "May report"})))
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let result = client
            .call_tool("generate_monthly_report", Some(json!({"month": "May"})), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(result, "May report");
    }

    #[tokio::test]
    async fn test_call_tool_missing_result() {
        let server = MockServer::start().await;
        Mock::given(path("/call_tool"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "x"})))
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let err = client.call_tool("t", None, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GatewayClientError::MissingResult));
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(path("/call_tool"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"detail": "MCP server is not connected"})))
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let err = client.call_tool("t", None, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GatewayClientError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(path("/call_tool"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": "late"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let err = client
            .call_tool("t", None, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayClientError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = GatewayClient::new("http://127.0.0.1:1").unwrap();
        let err = client.status(TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GatewayClientError::Connect(_)));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(path("/call_tool"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = GatewayClient::new(server.uri()).unwrap();
        let err = client.call_tool("t", None, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GatewayClientError::Json(_)));
    }
}
