//! Environment-driven configuration
//!
//! Recognized variables:
//! - `ENABLE_BROWSER_CRAWL` - enable the browser-automation tier
//! - `BROWSER_HEADLESS` - run the browser without a window (default true)
//! - `PROXY_URL` - single egress proxy
//! - `PROXY_LIST` - comma-separated proxy pool
//! - `ROTATE_PROXIES` - sample the pool per attempt
//! - `CRAWL_TIMEOUT` - per-request timeout in seconds

use super::builder::CrawlConfigBuilder;
use super::types::CrawlConfig;
use crate::crawl_engine::{CrawlError, CrawlResult};

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl CrawlConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::ConfigError` for malformed proxies or a
    /// non-numeric `CRAWL_TIMEOUT`.
    pub fn from_env() -> CrawlResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Same as [`CrawlConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> CrawlResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::builder_from_lookup(lookup)?.build()
    }

    /// Builder pre-populated from a key lookup, for further overrides
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::ConfigError` for a non-numeric `CRAWL_TIMEOUT`.
    pub fn builder_from_lookup<F>(lookup: F) -> CrawlResult<CrawlConfigBuilder>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = CrawlConfig::builder();

        if let Some(value) = lookup("ENABLE_BROWSER_CRAWL") {
            builder = builder.browser_enabled(parse_flag(&value));
        }
        if let Some(value) = lookup("BROWSER_HEADLESS") {
            builder = builder.headless(parse_flag(&value));
        }
        if let Some(value) = lookup("PROXY_URL").filter(|v| !v.trim().is_empty()) {
            builder = builder.proxy_url(Some(value));
        }
        if let Some(value) = lookup("PROXY_LIST") {
            let proxies = value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            builder = builder.proxy_list(proxies);
        }
        if let Some(value) = lookup("ROTATE_PROXIES") {
            builder = builder.rotate_proxies(parse_flag(&value));
        }
        if let Some(value) = lookup("CRAWL_TIMEOUT") {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                CrawlError::ConfigError(format!("CRAWL_TIMEOUT must be whole seconds: {e}"))
            })?;
            builder = builder.request_timeout_secs(secs);
        }

        Ok(builder)
    }
}
