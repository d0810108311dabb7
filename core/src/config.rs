//! Client configuration.
//!
//! The base address is an explicit value handed to the client at
//! construction; nothing reads it from global state.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const BASE_URL_ENV: &str = "RIVERMIND_API_URL";
pub const TIMEOUT_ENV: &str = "RIVERMIND_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address, stored without a trailing slash.
    pub base_url: String,
    /// Headers sent with every request unless the caller overrides them.
    pub default_headers: Vec<(String, String)>,
    /// Whole-request timeout applied by the transport. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Largest response body the transport will read.
    pub max_response_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: vec![("content-type".to_string(), "application/json".to_string())],
            timeout: Some(Duration::from_secs(30)),
            max_response_bytes: u64::MAX,
        }
    }

    /// Reject base addresses that are not http(s) URLs.
    pub fn validate(self) -> Result<Self, ApiError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(self)
    }

    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        set_header(&mut self.default_headers, name, value);
        self
    }

    /// Build from `RIVERMIND_API_URL` / `RIVERMIND_TIMEOUT_SECS`, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = match lookup(BASE_URL_ENV) {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
        .validate()?;
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::InvalidConfig(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}")))?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Insert or replace a header, matching names case-insensitively.
pub(crate) fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_ascii_lowercase(), value.to_string())),
    }
}
