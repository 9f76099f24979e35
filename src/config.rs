//! # Configuration
//!
//! Configuration loading for the depth engine.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override
//! earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `DEPTH_ENGINE_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DEPTH_ENGINE_CONFIG_FILE` | Config file path | `config.toml` |
//! | `DEPTH_ENGINE_LOG_LEVEL` | Log level | `info` |
//! | `DEPTH_ENGINE_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `DEPTH_ENGINE_RPC_URL` | Chain RPC endpoint | `http://localhost:8545` |
//! | `DEPTH_ENGINE_HTTP_TIMEOUT_MS` | Order-book request timeout | `10000` |
//!
//! # Examples
//!
//! ```ignore
//! use depth_engine::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("querying pools via {}", config.chain.rpc_url);
//! ```

use crate::infrastructure::venues::contract_client::MULTICALL3_ADDRESS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
        }
    }
}

// ============================================================================
// HTTP Configuration
// ============================================================================

/// Order-book fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_ms: u64,

    /// Retries after the initial attempt of each order-book fetch.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

// ============================================================================
// Chain Configuration
// ============================================================================

/// On-chain read configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// RPC endpoint URL.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Multicall contract address.
    #[serde(default = "default_multicall")]
    pub multicall_address: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            multicall_address: default_multicall(),
        }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Order-book fetch configuration.
    #[serde(default)]
    pub http: HttpConfig,

    /// On-chain read configuration.
    #[serde(default)]
    pub chain: ChainConfig,
}

impl AppConfig {
    /// Loads configuration from environment variables and optional config
    /// file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path = std::env::var("DEPTH_ENGINE_CONFIG_FILE")
            .unwrap_or_else(|_| "config.toml".to_string());
        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("DEPTH_ENGINE_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(format) = std::env::var("DEPTH_ENGINE_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }
        if let Ok(url) = std::env::var("DEPTH_ENGINE_RPC_URL") {
            self.chain.rpc_url = url;
        }
        if let Ok(address) = std::env::var("DEPTH_ENGINE_MULTICALL_ADDRESS") {
            self.chain.multicall_address = address;
        }
        if let Ok(timeout) = std::env::var("DEPTH_ENGINE_HTTP_TIMEOUT_MS")
            && let Ok(ms) = timeout.parse()
        {
            self.http.timeout_ms = ms;
        }
        if let Ok(retries) = std::env::var("DEPTH_ENGINE_HTTP_MAX_RETRIES")
            && let Ok(n) = retries.parse()
        {
            self.http.max_retries = n;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        if self.chain.rpc_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "chain.rpc_url".to_string(),
                message: "RPC URL cannot be empty".to_string(),
            });
        }

        if self.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_ms".to_string(),
                message: "timeout must be positive".to_string(),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_timeout() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1_000
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_multicall() -> String {
    MULTICALL3_ADDRESS.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log.level, "info");
        assert_eq!(config.http.timeout_ms, 10_000);
        assert_eq!(config.chain.multicall_address, MULTICALL3_ADDRESS);
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let mut config = AppConfig::default();
        config.log.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_rpc_url_fails_validation() {
        let mut config = AppConfig::default();
        config.chain.rpc_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = AppConfig::default();
        config.http.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [log]
            level = "debug"
            format = "pretty"

            [chain]
            rpc_url = "https://eth.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.chain.rpc_url, "https://eth.example.com");
        // Untouched sections fall back to defaults.
        assert_eq!(config.http.max_retries, 2);
    }

    #[test]
    fn log_format_default_is_json() {
        assert_eq!(LogFormat::default(), LogFormat::Json);
    }
}
