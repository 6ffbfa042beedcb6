//! HTTP gateway in front of the MCP server.
//!
//! The server side discovers the MCP tools once at startup and republishes
//! them as `/status`, `/list_tools` and `/call_tool`. [`GatewayClient`] is
//! the matching client used by the chat server and the WhatsApp bot.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod upstream;

pub use client::{GatewayClient, GatewayClientError, GatewayStatus};
pub use config::Config;
pub use error::GatewayError;
pub use upstream::Upstream;
