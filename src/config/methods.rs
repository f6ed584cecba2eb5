//! Setter methods for `CrawlConfigBuilder`

use std::time::Duration;

use super::builder::CrawlConfigBuilder;
use crate::evasion::EvasionSettings;

impl CrawlConfigBuilder {
    /// Enable or disable the browser-automation fetch tier
    ///
    /// The browser tier is the slowest and heaviest strategy: it launches a
    /// fresh Chromium process for every attempt. It is only consulted after
    /// both HTTP tiers came back empty.
    #[must_use]
    pub fn browser_enabled(mut self, enabled: bool) -> Self {
        self.browser_enabled = enabled;
        self
    }

    /// Set browser headless mode (visible vs invisible browser window)
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn proxy_url(mut self, proxy: Option<String>) -> Self {
        self.proxy_url = proxy;
        self
    }

    #[must_use]
    pub fn proxy_list(mut self, proxies: Vec<String>) -> Self {
        self.proxy_list = proxies;
        self
    }

    /// Sample a proxy from the proxy list independently for every attempt
    #[must_use]
    pub fn rotate_proxies(mut self, rotate: bool) -> Self {
        self.rotate_proxies = rotate;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn navigation_retries(mut self, retries: u8) -> Self {
        self.navigation_retries = retries;
        self
    }

    #[must_use]
    pub fn navigation_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.navigation_backoff_ms = backoff_ms;
        self
    }

    /// Set the randomized pre-request delay window of the challenge-aware client
    ///
    /// `(0, 0)` disables the delay entirely.
    #[must_use]
    pub fn challenge_delay_ms(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.challenge_delay_ms = (min_ms, max_ms);
        self
    }

    #[must_use]
    pub fn evasion(mut self, settings: EvasionSettings) -> Self {
        self.evasion = settings;
        self
    }

    /// Shortcut for the Cloudflare wait ceiling of the evasion settings
    #[must_use]
    pub fn cloudflare_timeout(mut self, timeout: Duration) -> Self {
        self.evasion.cloudflare_timeout = timeout;
        self
    }

    /// Shortcut for the captcha wait ceiling of the evasion settings
    #[must_use]
    pub fn captcha_timeout(mut self, timeout: Duration) -> Self {
        self.evasion.captcha_timeout = timeout;
        self
    }
}
