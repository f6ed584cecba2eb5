//! Getter methods for `CrawlConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `CrawlConfig` instance.

use std::time::Duration;

use super::types::CrawlConfig;
use crate::evasion::EvasionSettings;

impl CrawlConfig {
    #[must_use]
    pub fn browser_enabled(&self) -> bool {
        self.browser_enabled
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    #[must_use]
    pub fn proxy_list(&self) -> &[String] {
        &self.proxy_list
    }

    #[must_use]
    pub fn rotate_proxies(&self) -> bool {
        self.rotate_proxies
    }

    #[must_use]
    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    /// Per-request timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn navigation_retries(&self) -> u8 {
        self.navigation_retries
    }

    #[must_use]
    pub fn navigation_backoff(&self) -> Duration {
        Duration::from_millis(self.navigation_backoff_ms)
    }

    #[must_use]
    pub fn challenge_delay_ms(&self) -> (u64, u64) {
        self.challenge_delay_ms
    }

    #[must_use]
    pub fn evasion(&self) -> &EvasionSettings {
        &self.evasion
    }
}
