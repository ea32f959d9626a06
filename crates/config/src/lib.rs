//! Configuration loading, validation, and management for LearnVeda.
//!
//! Loads configuration from `~/.learnveda/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Advice shown when the generative-language request fails.
pub const DEFAULT_FALLBACK_ADVICE: &str = "Unable to generate analysis. Please check your API key.";

/// Environment variables consulted for the API key, highest priority first.
pub const API_KEY_ENV_VARS: [&str; 3] = ["LEARNVEDA_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// The root configuration structure.
///
/// Maps directly to `~/.learnveda/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider used for study advice
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Model used for study advice
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature for the advice request
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens for the advice response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// HTTP timeout for the advice request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Planner defaults and behavior switches
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret for Debug output.
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
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("planner", &self.planner)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Defaults offered by the interactive form, plus allocation switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "default_subject_count")]
    pub default_subjects: u32,

    #[serde(default = "default_chapter_count")]
    pub default_chapters: u32,

    #[serde(default = "default_total_days")]
    pub default_days: u32,

    #[serde(default = "default_daily_hours")]
    pub default_daily_hours: f64,

    /// Rescale adjusted hours so they sum to days x daily hours.
    /// Off by default: the keyword adjustments are allowed to drift the total.
    #[serde(default)]
    pub renormalize_hours: bool,

    /// Text used in place of the advice when the request fails
    #[serde(default = "default_fallback_advice")]
    pub fallback_advice: String,

    /// Largest number of subjects a single request may carry
    #[serde(default = "default_max_subjects")]
    pub max_subjects: u32,

    /// Largest `total_days` a single request may ask for
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

fn default_subject_count() -> u32 {
    3
}
fn default_chapter_count() -> u32 {
    10
}
fn default_total_days() -> u32 {
    4
}
fn default_daily_hours() -> f64 {
    4.0
}
fn default_fallback_advice() -> String {
    DEFAULT_FALLBACK_ADVICE.into()
}
fn default_max_subjects() -> u32 {
    50
}
fn default_max_days() -> u32 {
    366
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_subjects: default_subject_count(),
            default_chapters: default_chapter_count(),
            default_days: default_total_days(),
            default_daily_hours: default_daily_hours(),
            renormalize_hours: false,
            fallback_advice: default_fallback_advice(),
            max_subjects: default_max_subjects(),
            max_days: default_max_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8501".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.learnveda/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&Self::config_path())
    }

    /// Load configuration from `path` and apply environment overrides.
    ///
    /// API key lookup, when the file has none:
    /// - `LEARNVEDA_API_KEY` (highest priority)
    /// - `GEMINI_API_KEY`
    /// - `GOOGLE_API_KEY`
    pub fn load_with(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Like [`load_with`](Self::load_with), but a missing file is an error.
    ///
    /// Used for paths the user named explicitly.
    pub fn load_existing(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: "file not found".into(),
            });
        }
        Self::load_with(path)
    }

    /// Load configuration from a specific file path, without env overrides.
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

    /// Apply environment overrides using `lookup` to read variables.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = API_KEY_ENV_VARS
                .iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()));
        }

        if let Some(provider) = lookup("LEARNVEDA_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("LEARNVEDA_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".learnveda")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        let planner = &self.planner;
        if planner.default_subjects == 0 || planner.default_chapters == 0 || planner.default_days == 0
        {
            return Err(ConfigError::ValidationError(
                "planner defaults for subjects, chapters and days must be >= 1".into(),
            ));
        }

        if !(planner.default_daily_hours.is_finite() && planner.default_daily_hours > 0.0) {
            return Err(ConfigError::ValidationError(
                "planner.default_daily_hours must be a positive number".into(),
            ));
        }

        if planner.default_subjects > planner.max_subjects {
            return Err(ConfigError::ValidationError(format!(
                "planner.default_subjects ({}) exceeds planner.max_subjects ({})",
                planner.default_subjects, planner.max_subjects
            )));
        }

        if planner.default_days > planner.max_days {
            return Err(ConfigError::ValidationError(format!(
                "planner.default_days ({}) exceeds planner.max_days ({})",
                planner.default_days, planner.max_days
            )));
        }

        Ok(())
    }

    /// The API key for `provider`: its own entry first, then the global key.
    pub fn api_key_for(&self, provider: &str) -> Option<String> {
        self.providers
            .get(provider)
            .and_then(|p| p.api_key.clone())
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// The model to use with `provider`: its own default first, then the global one.
    pub fn model_for(&self, provider: &str) -> String {
        self.providers
            .get(provider)
            .and_then(|p| p.default_model.clone())
            .unwrap_or_else(|| self.default_model.clone())
    }

    /// Check if an API key is available for the default provider.
    pub fn has_api_key(&self) -> bool {
        self.api_key_for(&self.default_provider).is_some()
    }

    /// Generate a default config TOML string (for the `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            planner: PlannerConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
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
