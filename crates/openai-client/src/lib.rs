//! Client for OpenAI-compatible chat completions with function calling.

mod client;
mod config;
mod error;
mod types;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
pub use error::OpenAiError;
pub use types::*;
