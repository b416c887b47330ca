mod account;
mod dashboard;
mod details;
mod layout;

pub use account::{cmd_login, cmd_next_username, cmd_register};
pub use dashboard::{cmd_dashboard, cmd_offboard, cmd_onboard};
pub use details::cmd_save_details;
pub use layout::cmd_save_layout;

use anyhow::{Context, anyhow};

use crate::services::{FailureKind, SessionError};

/// Turns a failed session call into the command's error so the process exits
/// non-zero. Storage failures keep their cause chain.
fn command_error(err: SessionError) -> anyhow::Error {
    match err.kind() {
        FailureKind::Validation | FailureKind::NotFound => {
            if matches!(err, SessionError::InvalidCredentials) {
                anyhow!("Invalid credentials. Please try again.")
            } else {
                anyhow::Error::new(err)
            }
        }
        FailureKind::Storage => {
            anyhow::Error::new(err).context("An error occurred while accessing storage")
        }
    }
}
