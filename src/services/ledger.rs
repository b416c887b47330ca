//! Ordered ledger of account records, stored as one JSON array under
//! [`keys::REGISTRATIONS`].
//!
//! Every call re-reads the whole array; nothing is cached between calls.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::RegistrationConfig;
use crate::constants::keys;
use crate::db::{RecordStore, StoreError, save_document};
use crate::models::{AccountPatch, AccountRecord};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Formats sequence numbers into usernames such as `PG-007`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameFormat {
    pub prefix: String,
    pub digits: usize,
}

impl UsernameFormat {
    #[must_use]
    pub fn format(&self, sequence: usize) -> String {
        format!("{}-{:0width$}", self.prefix, sequence, width = self.digits)
    }
}

impl Default for UsernameFormat {
    fn default() -> Self {
        Self::from(&RegistrationConfig::default())
    }
}

impl From<&RegistrationConfig> for UsernameFormat {
    fn from(config: &RegistrationConfig) -> Self {
        Self {
            prefix: config.username_prefix.clone(),
            digits: config.username_digits,
        }
    }
}

/// One slot of the stored array. Entries that do not decode as an account are
/// carried along verbatim so a rewrite never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum LedgerEntry {
    Account(AccountRecord),
    Unreadable(Value),
}

impl LedgerEntry {
    fn username(&self) -> Option<&str> {
        match self {
            Self::Account(record) => Some(&record.username),
            Self::Unreadable(value) => value.get("username").and_then(Value::as_str),
        }
    }

    const fn account(&self) -> Option<&AccountRecord> {
        match self {
            Self::Account(record) => Some(record),
            Self::Unreadable(_) => None,
        }
    }
}

pub struct RegistrationLedger {
    store: Arc<dyn RecordStore>,
    usernames: UsernameFormat,
}

impl RegistrationLedger {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, usernames: UsernameFormat) -> Self {
        Self { store, usernames }
    }

    /// Every slot of the ledger, readable or not. A missing ledger is empty; a
    /// ledger that is not an array is a storage failure so it is never
    /// overwritten.
    async fn load(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let Some(document) = self.store.get(keys::REGISTRATIONS).await? else {
            return Ok(Vec::new());
        };

        let Value::Array(items) = document else {
            return Err(StoreError::Serialization(format!(
                "{} is not an array",
                keys::REGISTRATIONS
            )));
        };

        let entries: Vec<LedgerEntry> = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?;

        let unreadable = entries.iter().filter(|e| e.account().is_none()).count();
        if unreadable > 0 {
            warn!(unreadable, "Ledger holds entries that are not valid accounts");
        }

        Ok(entries)
    }

    async fn write(&self, entries: &[LedgerEntry]) -> Result<(), StoreError> {
        save_document(self.store.as_ref(), keys::REGISTRATIONS, &entries).await
    }

    /// Readable account records in ledger order.
    pub async fn entries(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let entries = self.load().await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                LedgerEntry::Account(record) => Some(record),
                LedgerEntry::Unreadable(_) => None,
            })
            .collect())
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let entries = self.entries().await?;
        Ok(entries.into_iter().find(|r| r.username == username))
    }

    /// Exact, case-sensitive match on both fields.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let entries = self.entries().await?;
        Ok(entries
            .into_iter()
            .find(|r| r.username == username && r.password == password))
    }

    /// Username the next registration would receive, counting unreadable
    /// entries too. Not reserved: two callers reading the same ledger length
    /// get the same answer.
    pub async fn next_generated_username(&self) -> Result<String, StoreError> {
        let count = self.load().await?.len();
        let username = self.usernames.format(count + 1);
        debug!(count, %username, "Previewed next username");
        Ok(username)
    }

    pub async fn append(&self, record: AccountRecord) -> Result<(), LedgerError> {
        let mut entries = self.load().await?;

        if entries
            .iter()
            .any(|e| e.username() == Some(record.username.as_str()))
        {
            return Err(LedgerError::DuplicateUsername(record.username));
        }

        let username = record.username.clone();
        entries.push(LedgerEntry::Account(record));
        self.write(&entries).await?;

        info!(%username, total = entries.len(), "Account appended to ledger");
        Ok(())
    }

    /// Merges `patch` over the first record named `username`, in place.
    ///
    /// Returns the updated record, or `None` (and writes nothing) when no
    /// readable record matches.
    pub async fn update_by_username(
        &self,
        username: &str,
        patch: &AccountPatch,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let mut entries = self.load().await?;

        let Some(record) = entries.iter_mut().find_map(|e| match e {
            LedgerEntry::Account(record) if record.username == username => Some(record),
            _ => None,
        }) else {
            debug!(%username, "No ledger entry to update");
            return Ok(None);
        };

        patch.apply(record);
        let updated = record.clone();
        self.write(&entries).await?;

        info!(%username, "Ledger entry updated");
        Ok(Some(updated))
    }
}
