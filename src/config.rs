//! Configuration management for sqltour.
//!
//! Handles loading configuration from a TOML file and resolving it, together
//! with CLI arguments, into the connection settings handed to the database
//! client.

use crate::error::{Result, TourError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_rows() -> usize {
    1000
}

/// Main configuration structure for sqltour.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Database location settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Query execution limits.
    #[serde(default)]
    pub query: QuerySettings,
}

/// The `[database]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: Option<PathBuf>,

    /// Open the database read-only.
    #[serde(default)]
    pub read_only: bool,
}

/// The `[query]` section of the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Query timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum rows returned from a single query.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_rows: default_max_rows(),
        }
    }
}

/// Resolved connection settings handed to the database client.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Path to the database file; `None` opens an in-memory database.
    pub path: Option<PathBuf>,

    /// Open the database read-only.
    pub read_only: bool,

    /// Query execution limits.
    pub query: QuerySettings,
}

impl ConnectionConfig {
    /// Connection settings for a database file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            read_only: false,
            query: QuerySettings::default(),
        }
    }

    /// Connection settings for a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            read_only: false,
            query: QuerySettings::default(),
        }
    }

    /// Returns a display string for logs and error messages.
    pub fn display_string(&self) -> String {
        match &self.path {
            Some(path) => format!("'{}'", path.display()),
            None => ":memory:".to_string(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqltour")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TourError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            TourError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
