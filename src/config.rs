//! Configuration file parser for ~/.config/cinelist/config.toml.
//!
//! The config file is optional: a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::theme::ThemeVariant;

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "CINELIST_API_URL";

/// Base URL of the Flask backend in a default local setup.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// How racing responses are reconciled with the displayed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Consistency {
    /// Whichever response resolves last is displayed, even if it belongs to an
    /// older action.
    #[default]
    LastResponse,
    /// Every action gets a sequence number; a response is dropped once a
    /// later-issued action's response has been displayed.
    LatestRequest,
}

/// Top-level client configuration.
///
/// All fields use `#[serde(default)]`, so any subset of keys can be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the recommendation service.
    pub api_base_url: String,

    /// Per-request timeout in seconds. 0 = wait indefinitely.
    pub request_timeout_secs: u64,

    /// Retry a request exactly once when it fails at the transport level.
    pub retry_on_transport_error: bool,

    /// Reconciliation policy for concurrent watchlist and recommendation requests.
    pub watchlist_consistency: Consistency,

    /// Colour theme, "dark" or "light".
    pub theme: ThemeVariant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 0,
            retry_on_transport_error: false,
            watchlist_consistency: Consistency::LastResponse,
            theme: ThemeVariant::Dark,
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "api_base_url",
        "request_timeout_secs",
        "retry_on_transport_error",
        "watchlist_consistency",
        "theme",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            api_base_url = %config.api_base_url,
            consistency = ?config.watchlist_consistency,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply `CINELIST_API_URL` and then the `--api-url` flag, in increasing precedence.
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(api_base_url = %url, "Service URL taken from {}", API_URL_ENV);
            self.api_base_url = url;
        }
        if let Some(url) = cli_url {
            tracing::debug!(api_base_url = %url, "Service URL taken from --api-url");
            self.api_base_url = url;
        }
        self
    }

    /// Configured request timeout, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============================================================================
// Tests
// ============================================================================
