//! Configuration loading, validation, and management for rosterhub.
//!
//! Loads configuration from `~/.rosterhub/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.rosterhub/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream provider credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Which completion provider to use
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model identity sent with every completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for completions
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Referer/origin identifier sent as `HTTP-Referer` (OpenRouter attribution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Application title sent as `X-Title` (OpenRouter attribution)
    #[serde(default = "default_app_title")]
    pub app_title: String,

    /// HTTP server configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_provider() -> String {
    "openrouter".into()
}
fn default_model() -> String {
    "mistralai/mistral-7b-instruct".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    600
}
fn default_app_title() -> String {
    "Student Info Chat".into()
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
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .field("gateway", &self.gateway)
            .field("store", &self.store)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed for cross-origin requests. Empty = same-origin only.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5500".into(),
        "http://localhost:3000".into(),
    ]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// How strictly `create` validates candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Require `studentID` and `fullName` only.
    Lenient,
    /// Additionally require program, yearLevel, gender, gmail, and university.
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the durable mirror (a single JSON array file).
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Validation mode applied by `create`.
    #[serde(default = "default_validation")]
    pub validation: ValidationMode,

    /// How many records (at most) the prompt builder embeds per question.
    #[serde(default = "default_prompt_record_cap")]
    pub prompt_record_cap: usize,
}

fn default_store_path() -> PathBuf {
    AppConfig::config_dir().join("students.json")
}
fn default_validation() -> ValidationMode {
    ValidationMode::Lenient
}
fn default_prompt_record_cap() -> usize {
    200
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            validation: default_validation(),
            prompt_record_cap: default_prompt_record_cap(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.rosterhub/config.toml).
    ///
    /// Also checks environment variables:
    /// - `ROSTERHUB_API_KEY` (highest priority), then `OPENROUTER_API_KEY`,
    ///   then `OPENAI_API_KEY` for the credential
    /// - `ROSTERHUB_PROVIDER` / `ROSTERHUB_MODEL` for provider and model
    /// - `FRONTEND_URL` for the referer header
    /// - `PORT` for the listen port
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("ROSTERHUB_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("ROSTERHUB_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("ROSTERHUB_MODEL") {
            config.model = model;
        }

        if config.referer.is_none() {
            config.referer = std::env::var("FRONTEND_URL").ok();
        }

        if let Ok(port) = std::env::var("PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a number, got '{port}'"))
            })?;
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
        dirs_home().join(".rosterhub")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "max_tokens must be greater than zero".into(),
            ));
        }

        if self.store.prompt_record_cap == 0 {
            return Err(ConfigError::ValidationError(
                "store.prompt_record_cap must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Check if an upstream credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            referer: None,
            app_title: default_app_title(),
            gateway: GatewayConfig::default(),
            store: StoreConfig::default(),
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
