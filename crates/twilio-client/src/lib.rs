//! Twilio REST API client for WhatsApp messages.

mod client;
mod error;
mod types;

pub use client::{whatsapp_address, TwilioClient, DEFAULT_API_BASE, SANDBOX_NUMBER};
pub use error::TwilioError;
pub use types::*;
