//! Process-level configuration for core bootstrap.
//!
//! # Responsibility
//! - Describe where the database lives, whether file logging is enabled,
//!   and which category notes fall back to.
//! - Read those settings from `NOTITAS_*` environment variables.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed ones are errors.
//! - Parsing never touches the filesystem.

use crate::logging::{default_log_level, LogConfig, LogLevel};
use crate::model::category::DEFAULT_CATEGORY_NAME;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "NOTITAS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "NOTITAS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "NOTITAS_LOG_DIR";
pub const ENV_DEFAULT_CATEGORY: &str = "NOTITAS_DEFAULT_CATEGORY";

/// Where the SQLite database is opened from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseLocation {
    #[default]
    InMemory,
    File(PathBuf),
}

/// Fallback category created at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCategoryConfig {
    pub name: String,
    pub description: Option<String>,
}

impl Default for DefaultCategoryConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CATEGORY_NAME.to_string(),
            description: None,
        }
    }
}

/// Complete core configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    pub database: DatabaseLocation,
    /// `None` disables file logging.
    pub logging: Option<LogConfig>,
    pub default_category: DefaultCategoryConfig,
}

/// Malformed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the raw value for
    /// an environment key.
    ///
    /// Logging is enabled only when `NOTITAS_LOG_DIR` is set; the level then
    /// defaults to `default_log_level()`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = match read(ENV_DB_PATH) {
            Some(path) if path.trim() == ":memory:" => DatabaseLocation::InMemory,
            Some(path) => DatabaseLocation::File(PathBuf::from(path.trim())),
            None => DatabaseLocation::InMemory,
        };

        let logging = match read(ENV_LOG_DIR) {
            Some(dir) => {
                let raw_level = read(ENV_LOG_LEVEL);
                let level = match raw_level.as_deref() {
                    Some(raw) => raw.parse::<LogLevel>().map_err(|err| {
                        ConfigError::InvalidValue {
                            key: ENV_LOG_LEVEL,
                            value: raw.to_string(),
                            reason: err.to_string(),
                        }
                    })?,
                    None => default_log_level(),
                };
                let log_dir = PathBuf::from(dir.trim());
                if !log_dir.is_absolute() {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_LOG_DIR,
                        value: dir,
                        reason: "log directory must be an absolute path".to_string(),
                    });
                }
                Some(LogConfig { level, log_dir })
            }
            None => None,
        };

        let default_category = match read(ENV_DEFAULT_CATEGORY) {
            Some(name) => DefaultCategoryConfig {
                name,
                description: None,
            },
            None => DefaultCategoryConfig::default(),
        };

        Ok(Self {
            database,
            logging,
            default_category,
        })
    }
}
