//! Configuration types for the gemchat engine.
//!
//! Settings come from (lowest to highest precedence) built-in defaults, an
//! optional JSON file, and the environment. The CLI layers its own flags on
//! top.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API credential.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model name.
pub const ENV_MODEL: &str = "GEMINI_MODEL";
/// Environment variable overriding the service base URL.
pub const ENV_BASE_URL: &str = "GEMINI_BASE_URL";

/// Default Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Main configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// API credential. Empty when not supplied; requests then fail remotely.
    #[serde(default)]
    pub api_key: String,

    /// Model name (e.g., "gemini-pro").
    #[serde(default = "default_model")]
    pub model: String,

    /// Service base URL, without the API path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds a turn may stay pending before it settles as failed. 0 waits forever.
    #[serde(default = "default_turn_timeout")]
    pub turn_timeout_secs: u64,

    /// HTTP request timeout in seconds. 0 leaves the transport without one.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_turn_timeout() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    60
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            turn_timeout_secs: default_turn_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ChatConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Unset or empty variables leave the current value alone.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
    }

    /// Whether an API credential is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Per-turn timeout, or `None` to wait indefinitely.
    pub fn turn_timeout(&self) -> Option<Duration> {
        (self.turn_timeout_secs > 0).then(|| Duration::from_secs(self.turn_timeout_secs))
    }

    /// HTTP request timeout, or `None` for no transport limit.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Copy of this config that is safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let api_key = if self.has_api_key() {
            "***".into()
        } else {
            String::new()
        };
        Self {
            api_key,
            ..self.clone()
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
