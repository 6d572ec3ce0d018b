//! Runtime configuration for store wiring.
//!
//! # Responsibility
//! - Carry the database location and collection names into adapters at
//!   construction time.
//! - Select how strictly edits are validated.
//!
//! # Invariants
//! - Collection names are non-empty after trim.
//! - Unset variables fall back to defaults; malformed values are errors.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_VERDICT_COLLECTION: &str = "verdicts";
pub const DEFAULT_USERS_COLLECTION: &str = "users";

pub const ENV_DB_PATH: &str = "VERDICT_DB_PATH";
pub const ENV_VERDICT_COLLECTION: &str = "VERDICT_COLLECTION";
pub const ENV_USERS_COLLECTION: &str = "VERDICT_USERS_COLLECTION";
pub const ENV_EDIT_POLICY: &str = "VERDICT_EDIT_POLICY";

/// Validation applied to the merged record on edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditPolicy {
    /// Blank fields are accepted on edit; only create enforces them.
    #[default]
    Lenient,
    /// Edit runs the same required-field check as create.
    Strict,
}

impl EditPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(key) => write!(f, "`{key}` must not be empty"),
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {}

/// Store wiring shared by services and the page API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; `None` lets the caller pick a default location.
    pub db_path: Option<PathBuf>,
    pub verdict_collection: String,
    pub users_collection: String,
    pub edit_policy: EditPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            verdict_collection: DEFAULT_VERDICT_COLLECTION.to_string(),
            users_collection: DEFAULT_USERS_COLLECTION.to_string(),
            edit_policy: EditPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Reads `VERDICT_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DB_PATH) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.db_path = Some(PathBuf::from(trimmed));
            }
        }
        if let Some(raw) = lookup(ENV_VERDICT_COLLECTION) {
            config.verdict_collection = non_empty(ENV_VERDICT_COLLECTION, &raw)?;
        }
        if let Some(raw) = lookup(ENV_USERS_COLLECTION) {
            config.users_collection = non_empty(ENV_USERS_COLLECTION, &raw)?;
        }
        if let Some(raw) = lookup(ENV_EDIT_POLICY) {
            config.edit_policy =
                EditPolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_EDIT_POLICY,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }
}

fn non_empty(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue(key));
    }
    Ok(trimmed.to_string())
}
