//! HTTP request handlers.

use super::types::{CallToolRequest, CallToolResponse, ListToolsResponse, StatusResponse};
use super::AppState;
use crate::error::GatewayError;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::Stream;
use std::convert::Infallible;
use tools::ToolDefinition;
use tracing::{info, warn};

/// Connection status.
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, GatewayError> {
    let tools = state.upstream.tools().await.ok_or(GatewayError::NotConnected)?;

    Ok(Json(StatusResponse {
        status: "connected".to_string(),
        tools_count: tools.len(),
    }))
}

/// Tools in the function-calling format.
pub async fn list_tools(
    State(state): State<AppState>,
) -> Result<Json<ListToolsResponse>, GatewayError> {
    let tools = state.upstream.tools().await.ok_or(GatewayError::NotConnected)?;

    Ok(Json(ListToolsResponse {
        tools: tools.into_iter().map(ToolDefinition::from).collect(),
    }))
}

/// Forward a tool call to the MCP server.
pub async fn call_tool(
    State(state): State<AppState>,
    payload: Result<Json<CallToolRequest>, JsonRejection>,
) -> Result<Json<CallToolResponse>, GatewayError> {
    let Json(request) = payload?;

    if !state.upstream.is_connected().await {
        return Err(GatewayError::NotConnected);
    }

    let tool_name = request
        .tool_name
        .filter(|name| !name.is_empty())
        .ok_or(GatewayError::MissingToolName)?;

    if !state.upstream.has_tool(&tool_name).await {
        warn!(tool = %tool_name, "Unknown tool requested");
        return Err(GatewayError::UnknownTool(tool_name));
    }

    let arguments = match request.arguments {
        Some(serde_json::Value::Null) | None => serde_json::json!({}),
        Some(arguments) => arguments,
    };

    info!(tool = %tool_name, "Calling tool");
    let result = state.upstream.call_tool(&tool_name, arguments).await?;

    Ok(Json(CallToolResponse { result }))
}

/// Heartbeat event stream.
pub async fn sse(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let period = state.heartbeat;

    let stream = async_stream::stream! {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            yield Ok(Event::default().data(r#"{"event": "heartbeat"}"#));
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
