//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on values that are present but
//! unusable. Nothing is strictly required: every field has a default.

pub mod badges;

use std::path::PathBuf;

use crate::error::{Error, Result};

pub use badges::BadgeCatalog;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `habits.json` and `user.json`.
    pub data_dir: PathBuf,
    /// Optional TOML badge catalogue replacing the built-in badges.
    pub badges_path: Option<PathBuf>,
    /// Display name given to a freshly created profile.
    pub user_name: String,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let data_dir = match optional_var("GROWBIT_DATA_DIR")? {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(),
        };

        Ok(Self {
            data_dir,
            badges_path: optional_var("GROWBIT_BADGES")?.map(PathBuf::from),
            user_name: optional_var("GROWBIT_USER_NAME")?
                .unwrap_or_else(|| "Demo User".to_string()),
            otel_endpoint: optional_var("OTEL_ENDPOINT")?,
            log_level: optional_var("LOG_LEVEL")?.unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The badge catalogue: the configured TOML file, or the built-in set.
    pub fn badge_catalog(&self) -> Result<BadgeCatalog> {
        match self.badges_path {
            Some(ref path) => BadgeCatalog::load_from_file(path),
            None => Ok(BadgeCatalog::builtin()),
        }
    }
}

/// Platform data directory plus `growbit`, or `./.growbit` when unknown.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("growbit"))
        .unwrap_or_else(|| PathBuf::from(".growbit"))
}

/// Read an optional variable. Set-but-blank counts as an error.
fn optional_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(Error::Config(format!(
            "environment variable {name} is set but empty"
        ))),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(Error::Config(format!(
            "environment variable {name} is not valid unicode"
        ))),
    }
}
