//! MCP client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MCP server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Response carried neither result nor error")]
    EmptyResult,
}
