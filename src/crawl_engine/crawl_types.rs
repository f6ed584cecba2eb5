//! Core types for crawl operations.
//!
//! This module contains the error type, the frontier entry, the crawl limits
//! and the outcome returned by the crawl controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::page_extractor::schema::PageRecord;
use crate::utils::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_DEPTH_CEILING,
    MAX_PAGES_CEILING,
};

/// Error type for crawl operations
///
/// Only `ConfigError` is ever returned by the public crawl entry points;
/// the other variants describe failures that the fetch tiers recover from
/// internally and are kept for logging and for the binary.
#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Browser error
    #[error("Browser error: {0}")]
    BrowserError(String),
    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Other errors
    #[error("Crawl error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

impl From<url::ParseError> for CrawlError {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(format!("Invalid URL: {err}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Represents an item in the crawl frontier with URL and depth tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: String,
    /// Link hops from the start URL
    pub depth: u8,
}

impl FrontierEntry {
    #[must_use]
    pub fn new(url: impl Into<String>, depth: u8) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Budget of a single crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    max_pages: usize,
    max_depth: u8,
    timeout: Duration,
}

impl CrawlLimits {
    /// Build limits, clamping pages to `[1, 25]` and depth to `[0, 3]`
    #[must_use]
    pub fn new(max_pages: usize, max_depth: u8, timeout: Duration) -> Self {
        Self {
            max_pages: max_pages.clamp(1, MAX_PAGES_CEILING),
            max_depth: max_depth.min(MAX_DEPTH_CEILING),
            timeout: if timeout.is_zero() {
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
            } else {
                timeout
            },
        }
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_PAGES,
            DEFAULT_MAX_DEPTH,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

/// Counters collected over one crawl invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Frontier entries handed to the fetch chain
    pub fetched: usize,
    /// Entries for which every fetch tier came back empty
    pub skipped_no_content: usize,
    /// Entries whose HTML produced no text
    pub skipped_empty_text: usize,
    /// Follow-up links admitted to the frontier
    pub enqueued: usize,
}

/// Result of a crawl: pages in discovery order plus counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub pages: Vec<PageRecord>,
    pub stats: CrawlStats,
}
