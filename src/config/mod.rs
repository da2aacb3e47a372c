//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Query defaults for list and leaderboard endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    #[serde(default = "default_leaderboard_limit")]
    pub default_leaderboard_limit: i64,
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_leaderboard_limit() -> i64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_leaderboard_limit: default_leaderboard_limit(),
        }
    }
}

/// Remote player feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Feed returning a JSON array of player records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// Generated player descriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeConfig {
    /// Environment variable holding the Anthropic API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_describe_timeout")]
    pub timeout_seconds: u64,

    /// Pause between requests
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_describe_timeout() -> u64 {
    120
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_describe_timeout(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub describe: DescribeConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            import: ImportConfig::default(),
            describe: DescribeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.api.default_page_size == 0 || self.api.max_page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Page sizes must be greater than 0".to_string(),
            ));
        }

        if self.api.default_page_size > self.api.max_page_size {
            return Err(ConfigError::ValidationError(format!(
                "Default page size {} exceeds max page size {}",
                self.api.default_page_size, self.api.max_page_size
            )));
        }

        if self.api.default_leaderboard_limit <= 0 {
            return Err(ConfigError::ValidationError(
                "Default leaderboard limit must be greater than 0".to_string(),
            ));
        }

        if self.import.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Import timeout must be greater than 0".to_string(),
            ));
        }

        if self.describe.max_tokens == 0 || self.describe.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Describe max_tokens and timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
