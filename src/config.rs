//! Client configuration

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CHAT_SYNC_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),
    #[error("CHAT_SYNC_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Configuration for talking to the chat backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Session to open on startup (binary only)
    pub initial_session: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            initial_session: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source, so tests don't touch the
    /// process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("CHAT_SYNC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let request_timeout = match lookup("CHAT_SYNC_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let initial_session = lookup("CHAT_SYNC_SESSION").filter(|s| !s.trim().is_empty());

        Ok(Self {
            base_url,
            request_timeout,
            initial_session,
        })
    }
}
