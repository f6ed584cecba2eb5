//! Fluent builder for `CrawlConfig`
//!
//! All fields are optional; `build()` validates proxy URLs so that a bad
//! proxy surfaces as a configuration error before any fetch is attempted.

use serde::Deserialize;
use url::Url;

use super::types::CrawlConfig;
use crate::crawl_engine::{CrawlError, CrawlResult};
use crate::evasion::EvasionSettings;
use crate::utils::{
    DEFAULT_CHALLENGE_DELAY_MS, DEFAULT_NAVIGATION_BACKOFF_MS, DEFAULT_NAVIGATION_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Validate a proxy URL and return it trimmed
fn validate_proxy(proxy: &str) -> CrawlResult<String> {
    let trimmed = proxy.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| CrawlError::ConfigError(format!("Invalid proxy URL '{trimmed}': {e}")))?;

    if !PROXY_SCHEMES.contains(&parsed.scheme()) {
        return Err(CrawlError::ConfigError(format!(
            "Unsupported proxy scheme '{}' in '{trimmed}'",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(CrawlError::ConfigError(format!(
            "Proxy URL '{trimmed}' has no host"
        )));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfigBuilder {
    pub(crate) browser_enabled: bool,
    pub(crate) headless: bool,
    pub(crate) proxy_url: Option<String>,
    pub(crate) proxy_list: Vec<String>,
    pub(crate) rotate_proxies: bool,
    pub(crate) request_timeout_secs: u64,
    pub(crate) navigation_retries: u8,
    pub(crate) navigation_backoff_ms: u64,
    pub(crate) challenge_delay_ms: (u64, u64),
    pub(crate) evasion: EvasionSettings,
}

impl Default for CrawlConfigBuilder {
    fn default() -> Self {
        Self {
            browser_enabled: false,
            headless: true,
            proxy_url: None,
            proxy_list: Vec::new(),
            rotate_proxies: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            navigation_retries: DEFAULT_NAVIGATION_RETRIES,
            navigation_backoff_ms: DEFAULT_NAVIGATION_BACKOFF_MS,
            challenge_delay_ms: DEFAULT_CHALLENGE_DELAY_MS,
            evasion: EvasionSettings::default(),
        }
    }
}

impl CrawlConfig {
    /// Create a builder for configuring a `CrawlConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }
}

impl TryFrom<CrawlConfigBuilder> for CrawlConfig {
    type Error = CrawlError;

    fn try_from(builder: CrawlConfigBuilder) -> CrawlResult<Self> {
        builder.build()
    }
}

impl CrawlConfigBuilder {
    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::ConfigError` if any proxy URL is malformed or
    /// uses a scheme the HTTP client cannot tunnel through.
    pub fn build(self) -> CrawlResult<CrawlConfig> {
        let proxy_url = self.proxy_url.as_deref().map(validate_proxy).transpose()?;
        let proxy_list = self
            .proxy_list
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| validate_proxy(p))
            .collect::<CrawlResult<Vec<_>>>()?;

        Ok(CrawlConfig {
            proxy_url,
            proxy_list,
            ..self.into_config()
        })
    }

    /// Assemble without validation; only used for known-good defaults
    pub(crate) fn into_config(self) -> CrawlConfig {
        let (lo, hi) = self.challenge_delay_ms;
        CrawlConfig {
            browser_enabled: self.browser_enabled,
            headless: self.headless,
            proxy_url: self.proxy_url,
            proxy_list: self.proxy_list,
            rotate_proxies: self.rotate_proxies,
            request_timeout_secs: self.request_timeout_secs.max(1),
            navigation_retries: self.navigation_retries.max(1),
            navigation_backoff_ms: self.navigation_backoff_ms,
            challenge_delay_ms: (lo.min(hi), lo.max(hi)),
            evasion: self.evasion,
        }
    }
}
