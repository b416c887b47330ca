//! Domain service behind the login, registration, detail and dashboard screens.
//!
//! Decides where a user goes after logging in and wraps every storage call the
//! screens make.

use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::models::{AccountRecord, OccupancyUpdate, PgDetails, PgLayout};
use crate::services::ledger::LedgerError;
use crate::services::property::PropertySnapshot;

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Generic alert; nothing was changed.
    Storage,
    /// Shown next to the offending field; the user may resubmit.
    Validation,
    /// Generic "invalid credentials" or unknown account.
    NotFound,
}

/// Errors specific to session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password too short: at least {min} characters required")]
    PasswordTooShort { min: usize },

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl SessionError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidCredentials | Self::AccountNotFound(_) => FailureKind::NotFound,
            Self::PasswordMismatch | Self::PasswordTooShort { .. } | Self::DuplicateUsername(_) => {
                FailureKind::Validation
            }
            Self::Storage(_) => FailureKind::Storage,
        }
    }
}

impl From<LedgerError> for SessionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateUsername(username) => Self::DuplicateUsername(username),
            LedgerError::Storage(e) => Self::Storage(e),
        }
    }
}

/// Screen a user is on, as far as the core is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowState {
    Login,
    AwaitingDetails,
    Dashboard,
}

impl FlowState {
    /// Where a successfully authenticated account lands.
    #[must_use]
    pub const fn after_login(record: &AccountRecord) -> Self {
        if record.first_login {
            Self::AwaitingDetails
        } else {
            Self::Dashboard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub username: String,
    pub next: FlowState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    /// Username assigned to the new account.
    pub username: String,
    /// Preview for the next registration.
    pub next_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub username: String,
    pub details: PgDetails,
    #[serde(flatten)]
    pub property: PropertySnapshot,
}

/// Domain service trait for the session flow.
#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Checks credentials and picks the next screen.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCredentials`] for an unknown username and
    /// for a wrong password alike.
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, SessionError>;

    /// Username the registration screen should display.
    async fn preview_username(&self) -> Result<String, SessionError>;

    /// Creates an account under the next generated username.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PasswordMismatch`] or [`SessionError::PasswordTooShort`]
    /// before the ledger is read.
    async fn register(
        &self,
        password: &str,
        confirm_password: &str,
    ) -> Result<RegistrationReceipt, SessionError>;

    /// Stores first-login details and clears the first-login flag.
    async fn save_details(
        &self,
        username: &str,
        details: PgDetails,
    ) -> Result<FlowState, SessionError>;

    /// Replaces the layout of a registered account.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AccountNotFound`] for a username missing from the
    /// ledger; the same holds for the dashboard and occupancy calls.
    async fn save_layout(&self, username: &str, layout: &PgLayout) -> Result<(), SessionError>;

    async fn load_dashboard(&self, username: &str) -> Result<DashboardView, SessionError>;

    async fn onboard(&self, username: &str) -> Result<OccupancyUpdate, SessionError>;

    async fn offboard(&self, username: &str) -> Result<OccupancyUpdate, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_follow_taxonomy() {
        assert_eq!(
            SessionError::InvalidCredentials.kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            SessionError::PasswordTooShort { min: 8 }.kind(),
            FailureKind::Validation
        );
        assert_eq!(
            SessionError::DuplicateUsername("PG-001".to_string()).kind(),
            FailureKind::Validation
        );
        assert_eq!(
            SessionError::Storage(StoreError::Unavailable("off".to_string())).kind(),
            FailureKind::Storage
        );
    }

    #[test]
    fn session_error_display() {
        let err = SessionError::PasswordTooShort { min: 8 };
        assert_eq!(
            err.to_string(),
            "Password too short: at least 8 characters required"
        );
    }

    #[test]
    fn first_login_gates_flow() {
        let mut record = AccountRecord::new("PG-001", "password1");
        assert_eq!(FlowState::after_login(&record), FlowState::AwaitingDetails);

        record.first_login = false;
        assert_eq!(FlowState::after_login(&record), FlowState::Dashboard);
    }
}
