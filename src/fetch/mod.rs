//! Multi-tier page fetching
//!
//! A [`FetchChain`] tries its strategies strictly in order and stops at the
//! first one that returns HTML. Strategies never fail loudly: every transport
//! or protocol error is logged and turned into "no content".

pub mod browser;
pub mod challenge;
pub mod headers;
pub mod plain;
pub mod proxy;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::CrawlConfig;

pub use browser::BrowserStrategy;
pub use challenge::ChallengeClientStrategy;
pub use headers::{CHALLENGE_PROFILE, HeaderProfile, PLAIN_PROFILES};
pub use plain::PlainClientStrategy;
pub use proxy::ProxySelector;

/// Per-request parameters shared by every tier
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub url: String,
    pub timeout: Duration,
    proxies: Arc<ProxySelector>,
}

impl FetchContext {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration, proxies: Arc<ProxySelector>) -> Self {
        Self {
            url: url.into(),
            timeout,
            proxies,
        }
    }

    /// Proxy for the next attempt; resampled on every call when rotating
    #[must_use]
    pub fn select_proxy(&self) -> Option<String> {
        self.proxies.select()
    }
}

/// One way of turning a URL into HTML
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some(html)` on success, `None` for "no content"
    async fn fetch(&self, ctx: &FetchContext) -> Option<String>;
}

/// What the crawl controller needs from the fetch layer
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page_html(&self, url: &str, timeout: Duration) -> Option<String>;
}

/// Ordered fallback over fetch strategies
pub struct FetchChain {
    strategies: Vec<Box<dyn FetchStrategy>>,
    proxies: Arc<ProxySelector>,
}

impl FetchChain {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn FetchStrategy>>, proxies: ProxySelector) -> Self {
        Self {
            strategies,
            proxies: Arc::new(proxies),
        }
    }

    /// Plain client, then challenge-aware client, then the browser when enabled
    #[must_use]
    pub fn from_config(config: &CrawlConfig) -> Self {
        let mut strategies: Vec<Box<dyn FetchStrategy>> = vec![
            Box::new(PlainClientStrategy::new()),
            Box::new(ChallengeClientStrategy::new(config.challenge_delay_ms())),
        ];
        if config.browser_enabled() {
            strategies.push(Box::new(BrowserStrategy::from_config(config)));
        } else {
            debug!("Browser tier disabled by configuration");
        }
        Self::new(strategies, ProxySelector::from_config(config))
    }

    /// Names of the configured tiers, in order
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl PageFetcher for FetchChain {
    async fn fetch_page_html(&self, url: &str, timeout: Duration) -> Option<String> {
        let ctx = FetchContext::new(url, timeout, Arc::clone(&self.proxies));

        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), url, "Trying fetch strategy");
            if let Some(html) = strategy.fetch(&ctx).await {
                info!(strategy = strategy.name(), url, bytes = html.len(), "Fetched page");
                return Some(html);
            }
        }

        info!(url, "All fetch strategies exhausted");
        None
    }
}

/// An HTTP response read to completion
#[derive(Debug, Clone)]
pub(crate) struct FetchedResponse {
    pub status: reqwest::StatusCode,
    pub content_type: String,
    pub body: String,
}

impl FetchedResponse {
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    /// 2xx status, an HTML content type and a non-blank body
    pub(crate) fn is_usable_html(&self) -> bool {
        self.status.is_success()
            && is_html_content_type(&self.content_type)
            && !self.body.trim().is_empty()
    }

    pub(crate) fn into_html(self) -> Option<String> {
        if self.is_usable_html() {
            Some(self.body)
        } else {
            debug!(
                status = self.status.as_u16(),
                content_type = %self.content_type,
                "Response rejected"
            );
            None
        }
    }
}

/// Whether a content type header announces an HTML document
#[must_use]
pub fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.contains("text/html") || lowered.contains("application/xhtml+xml")
}

/// Client builder shared by the HTTP tiers
pub(crate) fn build_client(
    profile: &HeaderProfile,
    timeout: Duration,
    proxy: Option<&str>,
    cookie_store: bool,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(profile.user_agent)
        .default_headers(profile.header_map())
        .timeout(timeout)
        .connect_timeout(timeout)
        .cookie_store(cookie_store)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(proxy) = proxy {
        builder = builder.proxy(
            reqwest::Proxy::all(proxy).with_context(|| format!("Invalid proxy URL: {proxy}"))?,
        );
    }

    builder.build().context("Failed to build HTTP client")
}
