use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::config;
use crate::constants::registration::{
    DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_USERNAME_DIGITS, DEFAULT_USERNAME_PREFIX,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub registration: RegistrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 1)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/digipg.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 1,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Generated usernames look like `<prefix>-<sequence>`
    pub username_prefix: String,

    /// Zero-padding width of the sequence number
    pub username_digits: usize,

    /// Only enforced when an account is created
    pub min_password_length: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            username_prefix: DEFAULT_USERNAME_PREFIX.to_string(),
            username_digits: DEFAULT_USERNAME_DIGITS,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl Config {
    /// Reads the first config file on the search path, falling back to
    /// defaults. Runs before logging is up, so the caller reports the source.
    pub fn discover() -> Result<(Self, ConfigSource)> {
        match search_path().into_iter().find(|path| path.is_file()) {
            Some(path) => Ok((Self::from_file(&path)?, ConfigSource::File(path))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;

        toml::from_str(&raw).with_context(|| format!("Invalid TOML in {}", path.display()))
    }

    /// Writes the default config to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn write_default(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }

        let body = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, body).with_context(|| format!("Cannot write {}", path.display()))?;
        info!(path = %path.display(), "Wrote default config");
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.registration.username_prefix.trim().is_empty() {
            anyhow::bail!("registration.username_prefix cannot be empty");
        }

        if self.registration.username_digits == 0 {
            anyhow::bail!("registration.username_digits must be > 0");
        }

        if self.registration.min_password_length == 0 {
            anyhow::bail!("registration.min_password_length must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "general.min_db_connections ({}) exceeds max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "general.log_format must be \"pretty\" or \"json\", got \"{}\"",
                self.general.log_format
            );
        }

        Ok(())
    }
}

/// Working directory first, then the platform config dir, then `~/.digipg`.
fn search_path() -> Vec<PathBuf> {
    let platform = dirs::config_dir().map(|dir| dir.join(config::APP_DIR).join(config::FILE_NAME));
    let home = dirs::home_dir().map(|dir| dir.join(config::HOME_DIR).join(config::FILE_NAME));

    std::iter::once(PathBuf::from(config::FILE_NAME))
        .chain(platform)
        .chain(home)
        .collect()
}
