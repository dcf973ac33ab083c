#![deny(unsafe_code)]

//! Configuration loading and validation for the downline explorer.
//!
//! Loads TOML configuration files and validates them against expected schemas.
//! Provides the [`AppConfig`] type as the central configuration structure
//! shared by the CLI and the TUI.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where genealogy trees are fetched from.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Tree view defaults.
    #[serde(default)]
    pub tree: TreeConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which tree backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayBackend {
    /// The genealogy REST endpoint.
    #[default]
    Http,
    /// A full tree loaded from a local JSON file.
    Fixture,
}

/// Tree fetch gateway configuration.
///
/// ## TOML Example
///
/// ```toml
/// [gateway]
/// backend = "http"
/// base_url = "https://mlm.example.com/api"
/// api_token = "..."
/// timeout_secs = 15
/// cache_ttl_secs = 120
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Backend kind: "http" or "fixture".
    #[serde(default)]
    pub backend: GatewayBackend,

    /// Base URL of the REST API (when backend = "http").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request. Avoid committing this to disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How long a fetched tree is served from cache (0 = no caching).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Path to the JSON tree document (when backend = "fixture").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("fixture_path", &self.fixture_path)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend: GatewayBackend::default(),
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            fixture_path: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_cache_ttl_secs() -> u64 {
    120
}

/// Tree view defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Depth requested when a session starts.
    #[serde(default = "default_depth")]
    pub default_depth: u32,

    /// Depths above this value produce a "may be slow" advisory.
    #[serde(default = "default_advisory_depth_threshold")]
    pub advisory_depth_threshold: u32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            advisory_depth_threshold: default_advisory_depth_threshold(),
        }
    }
}

fn default_depth() -> u32 {
    3
}

fn default_advisory_depth_threshold() -> u32 {
    50
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// File the TUI writes its log to. The TUI stays silent when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), backend = ?config.gateway.backend, "Loaded config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.gateway.backend {
            GatewayBackend::Http => {
                if self.gateway.base_url.trim().is_empty() {
                    return Err(ConfigError::Validation(
                        "gateway.base_url must not be empty".to_string(),
                    ));
                }
                if !self.gateway.base_url.starts_with("http://")
                    && !self.gateway.base_url.starts_with("https://")
                {
                    return Err(ConfigError::Validation(format!(
                        "gateway.base_url must be an http(s) URL, got {:?}",
                        self.gateway.base_url
                    )));
                }
            }
            GatewayBackend::Fixture => {
                if self
                    .gateway
                    .fixture_path
                    .as_deref()
                    .is_none_or(|p| p.trim().is_empty())
                {
                    return Err(ConfigError::Validation(
                        "gateway.fixture_path is required when backend is \"fixture\"".to_string(),
                    ));
                }
            }
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.timeout_secs must be non-zero".to_string(),
            ));
        }

        if self.tree.default_depth == 0 {
            return Err(ConfigError::Validation(
                "tree.default_depth must be at least 1".to_string(),
            ));
        }
        if self.tree.advisory_depth_threshold == 0 {
            return Err(ConfigError::Validation(
                "tree.advisory_depth_threshold must be at least 1".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
