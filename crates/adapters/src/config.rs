use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime configuration for an exchange adapter
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// API key (public identifier)
    pub api_key: Option<String>,

    /// API secret used for request signing
    pub api_secret: Option<String>,

    /// Overrides the descriptor's API base URL (proxies, test servers)
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Whether to pace requests by the exchange's rate limit
    pub enable_rate_limit: bool,
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("enable_rate_limit", &self.enable_rate_limit)
            .finish()
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: None,
            timeout_secs: 30,
            enable_rate_limit: true,
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `LAKEBTC_*` variables, reading a `.env` file first when present
    ///
    /// Recognized: `LAKEBTC_API_KEY`, `LAKEBTC_API_SECRET`, `LAKEBTC_API_URL`,
    /// `LAKEBTC_TIMEOUT_SECS`, `LAKEBTC_ENABLE_RATE_LIMIT`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.api_key = lookup("LAKEBTC_API_KEY").filter(|v| !v.is_empty());
        config.api_secret = lookup("LAKEBTC_API_SECRET").filter(|v| !v.is_empty());
        config.base_url = lookup("LAKEBTC_API_URL").filter(|v| !v.is_empty());

        if let Some(raw) = lookup("LAKEBTC_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .parse()
                .map_err(|_| AdapterError::Config(format!("LAKEBTC_TIMEOUT_SECS is not a number: {}", raw)))?;
        }
        if let Some(raw) = lookup("LAKEBTC_ENABLE_RATE_LIMIT") {
            config.enable_rate_limit = raw
                .parse()
                .map_err(|_| AdapterError::Config(format!("LAKEBTC_ENABLE_RATE_LIMIT is not a bool: {}", raw)))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_rate_limit(mut self, enabled: bool) -> Self {
        self.enable_rate_limit = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AdapterError::Config("timeout cannot be zero".to_string()));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AdapterError::Config(format!("base url must be http(s): {}", url)));
            }
        }
        Ok(())
    }
}
