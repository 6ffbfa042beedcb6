//! Bootstrap of the `.env` file for the WhatsApp sandbox.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use twilio_client::SANDBOX_NUMBER;

pub const ENV_FILE: &str = ".env";
pub const TEMPLATE_FILE: &str = ".env-template";

const PHONE_KEY: &str = "TWILIO__PHONE_NUMBER=";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{} file not found", .0.display())]
    TemplateMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// `.env` was copied from the template
    Created,
    /// The sender number was switched to the sandbox number
    Updated,
    AlreadyCorrect,
}

/// Create `dir/.env` from the template, or point an existing one at the
/// sandbox sender number.
pub fn create_or_update_env(dir: &Path) -> Result<SetupOutcome, SetupError> {
    let template = dir.join(TEMPLATE_FILE);
    let env = dir.join(ENV_FILE);

    if !template.exists() {
        return Err(SetupError::TemplateMissing(template));
    }

    if !env.exists() {
        fs::copy(&template, &env)?;
        return Ok(SetupOutcome::Created);
    }

    let contents = fs::read_to_string(&env)?;
    let (rewritten, updated) = rewrite_phone_number(&contents);
    if !updated {
        return Ok(SetupOutcome::AlreadyCorrect);
    }

    fs::write(&env, rewritten)?;
    Ok(SetupOutcome::Updated)
}

/// Replace every sender number line that does not hold the sandbox number.
fn rewrite_phone_number(contents: &str) -> (String, bool) {
    let mut updated = false;
    let mut out = String::with_capacity(contents.len());

    for line in contents.split_inclusive('\n') {
        if line.starts_with(PHONE_KEY) && !line.contains(SANDBOX_NUMBER) {
            out.push_str(PHONE_KEY);
            out.push_str(SANDBOX_NUMBER);
            if line.ends_with('\n') {
                out.push('\n');
            }
            updated = true;
        } else {
            out.push_str(line);
        }
    }

    (out, updated)
}

/// Steps for joining the Twilio WhatsApp sandbox.
pub fn sandbox_instructions() -> Vec<String> {
    vec![
        "1. Go to: https://www.twilio.com/console/sms/whatsapp/sandbox".to_string(),
        "2. Get the join code (like 'join example-word')".to_string(),
        format!("3. Send this code via WhatsApp to {}", SANDBOX_NUMBER),
        "4. Wait for confirmation from WhatsApp that you've joined the sandbox".to_string(),
    ]
}
