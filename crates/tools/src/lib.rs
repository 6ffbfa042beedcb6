//! Advisor tools: the tool trait, registry, executor and the built-in
//! transaction analysis and email tools.

mod analyst;
mod error;
mod executor;
mod registry;
mod types;
pub mod builtin;

pub use analyst::Analyst;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use types::*;
