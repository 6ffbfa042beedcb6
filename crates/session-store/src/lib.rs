//! In-memory chat sessions with TTL-based expiration.
//!
//! Nothing is persisted; sessions disappear after the configured TTL of
//! inactivity or when the process exits.

mod store;
mod types;

pub use store::SessionStore;
pub use types::*;
