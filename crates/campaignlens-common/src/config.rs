//! Configuration for CampaignLens

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CAMPAIGNLENS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Web UI configuration
    #[serde(default)]
    pub web: WebConfig,

    /// Remote campaign API configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Web UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Web UI server bind address
    #[serde(default = "default_web_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_web_bind(),
        }
    }
}

fn default_web_bind() -> String {
    "127.0.0.1:8090".to_string()
}

/// Remote campaign API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the marketing API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the campaign list resource
    #[serde(default = "default_campaigns_path")]
    pub campaigns_path: String,

    /// Path of the mailbox account list resource
    #[serde(default = "default_accounts_path")]
    pub accounts_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            campaigns_path: default_campaigns_path(),
            accounts_path: default_accounts_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://server.smartlead.ai".to_string()
}

fn default_campaigns_path() -> String {
    "/api/v1/campaigns".to_string()
}

fn default_accounts_path() -> String {
    "/api/v1/email-accounts".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl LoggingConfig {
    /// Whether log lines should be emitted as JSON
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from the first default location that exists,
    /// with `CAMPAIGNLENS__SECTION__KEY` environment overrides on top.
    ///
    /// Falls back to built-in defaults when no file is present.
    pub fn load() -> crate::Result<Self> {
        let paths = [
            PathBuf::from("./campaignlens.toml"),
            PathBuf::from("/etc/campaignlens/config.toml"),
        ];

        Self::load_layered(paths.iter().find(|p| p.exists()).map(PathBuf::as_path))
    }

    /// Build configuration from an optional file plus environment overrides
    pub fn load_layered(file: Option<&Path>) -> crate::Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = file {
            tracing::debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::Error::Config(format!("Failed to load config: {}", e)))?;

        settings
            .try_deserialize()
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Full URL of the campaign list resource
    pub fn campaigns_url(&self) -> String {
        join_url(&self.provider.base_url, &self.provider.campaigns_path)
    }

    /// Full URL of the mailbox account list resource
    pub fn accounts_url(&self) -> String {
        join_url(&self.provider.base_url, &self.provider.accounts_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
