//! Runtime configuration for the SAHMK API client.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://app.sahmk.sa/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_ENV: &str = "SAHMK_API_KEY";
pub const BASE_URL_ENV: &str = "SAHMK_API_BASE";

/// Connection settings for the market-data API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    api_key: String,
    timeout: Duration,
    cache_ttl: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ValidationError> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
        })
    }

    /// Read `SAHMK_API_KEY` and `SAHMK_API_BASE` from the environment.
    ///
    /// A missing key is not an error: the API answers with 401 and the
    /// failure surfaces through the normal reporting path.
    pub fn from_env() -> Result<Self, ValidationError> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| String::from(DEFAULT_BASE_URL));
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_default();
        Self::new(base_url, api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ValidationError> {
        self.base_url = normalize_base_url(base_url.into())?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ValidationError> {
        if timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }
        self.timeout = timeout;
        Ok(self)
    }

    /// A zero TTL turns response caching off.
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl Debug for ApiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<unset>" })
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

fn normalize_base_url(value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidBaseUrl { value });
    }
    Ok(trimmed.to_owned())
}
