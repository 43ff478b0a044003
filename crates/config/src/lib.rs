//! Configuration loading, validation, and management for Folio.
//!
//! Loads configuration from `~/.folio/config.toml` with environment
//! variable overrides applied once at load time. Adapters receive their
//! credentials from this structure by constructor injection — nothing
//! downstream reads ambient environment state, so tests can substitute
//! credentials without mutating the process environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.folio/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the knowledge corpus TOML file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Locale used when a request does not carry one
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Gateway listener settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Primary provider (OpenAI-compatible chat-completion endpoint)
    #[serde(default)]
    pub primary: ProviderConfig,

    /// Secondary provider (Gemini generation endpoint)
    #[serde(default)]
    pub secondary: ProviderConfig,
}

fn default_locale() -> String {
    folio_corpus::DEFAULT_LOCALE.into()
}

fn default_corpus_path() -> PathBuf {
    AppConfig::config_dir().join("corpus.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8741
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Settings for one provider slot. Every field is optional; the
/// provider builder supplies well-known defaults for whatever is absent.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Service credential. Absence is a valid runtime state: the adapter
    /// fails fast with a configuration-error outcome and failover moves on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL override for the provider API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model identifier override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("corpus_path", &self.corpus_path)
            .field("default_locale", &self.default_locale)
            .field("gateway", &self.gateway)
            .field("primary", &self.primary)
            .field("secondary", &self.secondary)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.folio/config.toml).
    ///
    /// Environment variables override missing credentials:
    /// - `FOLIO_PRIMARY_API_KEY`, then `OPENAI_API_KEY`, for the primary
    /// - `FOLIO_SECONDARY_API_KEY`, then `GEMINI_API_KEY`, for the secondary
    /// - `FOLIO_CORPUS` for the corpus path
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.primary.api_key.is_none() {
            config.primary.api_key = std::env::var("FOLIO_PRIMARY_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if config.secondary.api_key.is_none() {
            config.secondary.api_key = std::env::var("FOLIO_SECONDARY_API_KEY")
                .ok()
                .or_else(|| std::env::var("GEMINI_API_KEY").ok());
        }

        if let Ok(path) = std::env::var("FOLIO_CORPUS") {
            config.corpus_path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".folio")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.port must not be 0".into(),
            ));
        }
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "default_locale must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string (for `onboard`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            default_locale: default_locale(),
            gateway: GatewayConfig::default(),
            primary: ProviderConfig::default(),
            secondary: ProviderConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
