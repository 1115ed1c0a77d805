//! Configuration file parsing for the Router.
//!
//! Loads settings from TOML files including bind address, database path,
//! confidence thresholds, and write rate limits.

use heuer_domain::LikelihoodPolicy;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database file (`:memory:` for a throwaway store)
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Confidence thresholds for likelihood rankings
    #[serde(default)]
    pub policy: LikelihoodPolicy,

    /// Per-analyst write limits
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Write rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    /// Writes allowed per analyst inside one window
    #[serde(default = "default_max_writes")]
    pub max_writes: u32,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_writes: default_max_writes(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_database_path() -> String {
    "heuer.db".to_string()
}

fn default_max_writes() -> u32 {
    120
}

fn default_window_secs() -> u64 {
    60
}

impl RouterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: RouterConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate().map_err(ConfigError::Invalid)?;

        if self.rate_limit.max_writes == 0 {
            return Err(ConfigError::Invalid("rate_limit.max_writes must be at least 1".to_string()));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid("rate_limit.window_secs must be at least 1".to_string()));
        }
        if self.database_path.is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".to_string()));
        }

        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        RouterConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            policy: LikelihoodPolicy::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
