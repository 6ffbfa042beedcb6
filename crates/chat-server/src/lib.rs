//! Chat API for the financial advisor.
//!
//! Each request runs a function-calling loop against the language model,
//! with the gateway's tools on offer.

pub mod agent;
pub mod api;
pub mod config;
pub mod error;

pub use agent::ChatAgent;
pub use config::Config;
pub use error::ChatError;
