use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the registration ledger, stored in its camelCase JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub username: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub first_login: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pg_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pg_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pg_owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pg_phone_number: Option<String>,
    /// Fields this version does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl AccountRecord {
    /// A freshly registered account; details are captured on first login.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            first_login: true,
            pg_name: None,
            pg_address: None,
            pg_owner_name: None,
            pg_phone_number: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn details(&self) -> PgDetails {
        PgDetails {
            pg_name: self.pg_name.clone().unwrap_or_default(),
            pg_address: self.pg_address.clone().unwrap_or_default(),
            pg_owner_name: self.pg_owner_name.clone().unwrap_or_default(),
            pg_phone_number: self.pg_phone_number.clone().unwrap_or_default(),
        }
    }
}

/// Property details captured on first login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PgDetails {
    pub pg_name: String,
    pub pg_address: String,
    pub pg_owner_name: String,
    pub pg_phone_number: String,
}

/// Partial update merged over an existing record. `None` leaves a field as is;
/// the username is never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub password: Option<String>,
    pub first_login: Option<bool>,
    pub pg_name: Option<String>,
    pub pg_address: Option<String>,
    pub pg_owner_name: Option<String>,
    pub pg_phone_number: Option<String>,
}

impl AccountPatch {
    /// The patch applied when first-login details are saved.
    #[must_use]
    pub fn completing_details(details: PgDetails) -> Self {
        Self {
            password: None,
            first_login: Some(false),
            pg_name: Some(details.pg_name),
            pg_address: Some(details.pg_address),
            pg_owner_name: Some(details.pg_owner_name),
            pg_phone_number: Some(details.pg_phone_number),
        }
    }

    pub fn apply(&self, record: &mut AccountRecord) {
        if let Some(password) = &self.password {
            record.password.clone_from(password);
        }
        if let Some(first_login) = self.first_login {
            record.first_login = first_login;
        }
        if let Some(name) = &self.pg_name {
            record.pg_name = Some(name.clone());
        }
        if let Some(address) = &self.pg_address {
            record.pg_address = Some(address.clone());
        }
        if let Some(owner) = &self.pg_owner_name {
            record.pg_owner_name = Some(owner.clone());
        }
        if let Some(phone) = &self.pg_phone_number {
            record.pg_phone_number = Some(phone.clone());
        }
    }
}
