//! Creates or updates `.env` for the WhatsApp sandbox.

use anyhow::{Context, Result};
use tracing::info;
use whatsapp_bot::setup::{create_or_update_env, sandbox_instructions, SetupOutcome};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    info!("===== WhatsApp Environment Setup =====");

    let dir = std::env::current_dir().context("Failed to read current directory")?;
    match create_or_update_env(&dir)? {
        SetupOutcome::Created => info!("Created new .env file from template."),
        SetupOutcome::Updated => {
            info!("Updated TWILIO__PHONE_NUMBER to the WhatsApp sandbox number.")
        }
        SetupOutcome::AlreadyCorrect => info!("TWILIO__PHONE_NUMBER already set correctly."),
    }

    info!("--- WhatsApp Sandbox Setup Instructions ---");
    for step in sandbox_instructions() {
        info!("{}", step);
    }
    info!("After completing these steps, run: cargo run --bin whatsapp-bot");

    Ok(())
}
