//! WhatsApp front-end for the financial advisor.
//!
//! Incoming messages arrive through a Twilio webhook, are routed to a
//! canned answer or a gateway tool by [`Responder`], and the reply goes
//! back as TwiML.

pub mod api;
pub mod config;
pub mod error;
pub mod responder;
pub mod setup;
pub mod twiml;

pub use config::Config;
pub use error::BotError;
pub use responder::{Intent, Responder};
