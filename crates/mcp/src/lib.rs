//! Model Context Protocol over HTTP: JSON-RPC 2.0 envelopes, the
//! server-side request handler and a client for remote servers.

mod client;
mod error;
pub mod rpc;
mod service;
mod types;

pub use client::McpClient;
pub use error::McpError;
pub use rpc::{OutboundResponse, RpcError, RpcRequest};
pub use service::{McpService, SERVER_NAME};
pub use types::*;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
