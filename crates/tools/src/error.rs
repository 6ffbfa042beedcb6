//! Tool execution errors.

use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Invalid arguments provided to tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool is not configured (missing credentials, etc.).
    #[error("Tool not configured: {0}")]
    NotConfigured(String),

    /// The language model call failed.
    #[error("Model error: {0}")]
    Model(#[from] openai_client::OpenAiError),

    /// Statistics could not be produced from the dataset.
    #[error("Dataset error: {0}")]
    Dataset(#[from] transactions::TransactionError),
}
