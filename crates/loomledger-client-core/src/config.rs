use std::time::Duration;

use crate::notifications::DEFAULT_POLL_INTERVAL;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const HOST_API_URL: &str = "API_URL";
pub const HOST_LOG_FILTER: &str = "LOOMLEDGER_LOG_FILTER";
pub const HOST_NOTIFICATION_POLL_MS: &str = "LOOMLEDGER_NOTIFICATION_POLL_MS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api url must not be empty")]
    EmptyApiUrl,
    #[error("invalid API_URL value '{0}': use http(s)://host[/path] or a /root-relative path")]
    InvalidApiUrl(String),
    #[error("invalid LOOMLEDGER_NOTIFICATION_POLL_MS value '{0}': expected a positive integer")]
    InvalidPollInterval(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub log_filter: String,
    pub notification_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            notification_poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Resolves configuration from host-provided values. In the browser the
    /// lookup reads globals the page template defines before loading the
    /// module.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = match non_empty(HOST_API_URL) {
            Some(raw) => normalize_api_base_url(&raw)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let log_filter = non_empty(HOST_LOG_FILTER)
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let notification_poll_interval = match non_empty(HOST_NOTIFICATION_POLL_MS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|millis| *millis > 0)
                .map(Duration::from_millis)
                .ok_or(ConfigError::InvalidPollInterval(raw))?,
            None => DEFAULT_POLL_INTERVAL,
        };

        Ok(Self {
            api_url,
            log_filter,
            notification_poll_interval,
        })
    }
}

pub fn normalize_api_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        // A bare "/" means same-origin root.
        if raw.trim().starts_with('/') {
            return Ok(String::new());
        }
        return Err(ConfigError::EmptyApiUrl);
    }
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        return Ok(trimmed.to_string());
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidApiUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
