//! Core configuration types for crawling
//!
//! This module contains the main `CrawlConfig` struct consumed by the fetch
//! chain and the crawl controller.

use serde::{Deserialize, Serialize};

use super::builder::CrawlConfigBuilder;
use crate::evasion::EvasionSettings;

/// Main configuration struct for crawl operations
///
/// Deserializes through `CrawlConfigBuilder`, so stored configs get the same
/// proxy validation as built ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CrawlConfigBuilder")]
pub struct CrawlConfig {
    /// Enables the browser-automation fetch tier.
    ///
    /// When disabled the chain stops after the two HTTP tiers.
    ///
    /// Default: false
    pub(crate) browser_enabled: bool,

    /// Run the automated browser without a window
    ///
    /// Default: true
    pub(crate) headless: bool,

    /// Single egress proxy applied to every fetch attempt
    pub(crate) proxy_url: Option<String>,

    /// Proxy pool sampled per attempt when `rotate_proxies` is set
    pub(crate) proxy_list: Vec<String>,

    /// Sample a proxy from `proxy_list` independently for every attempt
    pub(crate) rotate_proxies: bool,

    /// Timeout in seconds for a single network call of any tier
    ///
    /// Default: 15 seconds
    pub(crate) request_timeout_secs: u64,

    /// Navigation attempts made by the browser tier
    ///
    /// Default: 3
    pub(crate) navigation_retries: u8,

    /// Base backoff between navigation attempts, multiplied by attempt number
    ///
    /// Default: 2000 ms
    pub(crate) navigation_backoff_ms: u64,

    /// Inclusive `(min, max)` window of the randomized delay applied before
    /// challenge-aware requests
    ///
    /// Default: (1000, 3000) ms
    pub(crate) challenge_delay_ms: (u64, u64),

    /// Timings for the Cloudflare and captcha loops
    pub(crate) evasion: EvasionSettings,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        // Defaults never fail validation
        Self::builder().into_config()
    }
}
