use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::{Page, cdp};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{FetchContext, FetchStrategy};
use crate::browser_setup::{LaunchOptions, LaunchedBrowser, launch_browser};
use crate::config::CrawlConfig;
use crate::evasion::{BrowserPage, ChallengePage, EvasionSettings, Fingerprint, run_challenge_pipeline};
use crate::utils::constants::{BROWSER_TIMEZONE, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// CDP calls need more headroom than a single HTTP request
const MIN_CDP_TIMEOUT: Duration = Duration::from_secs(30);

/// Last tier: a throwaway, hardened Chrome per attempt
///
/// Order of work: stealth, navigation with retries, Cloudflare, captcha, then
/// the final DOM read. The browser is shut down on every path.
#[derive(Debug, Clone)]
pub struct BrowserStrategy {
    headless: bool,
    navigation_retries: u8,
    navigation_backoff: Duration,
    evasion: EvasionSettings,
}

impl BrowserStrategy {
    #[must_use]
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            headless: config.headless(),
            navigation_retries: config.navigation_retries().max(1),
            navigation_backoff: config.navigation_backoff(),
            evasion: config.evasion().clone(),
        }
    }

    async fn fetch_with_browser(&self, ctx: &FetchContext) -> Result<Option<String>> {
        let options = LaunchOptions {
            headless: self.headless,
            proxy: ctx.select_proxy(),
            request_timeout: ctx.timeout.max(MIN_CDP_TIMEOUT),
        };
        let launched = launch_browser(&options).await?;

        let result = self.drive(&launched, ctx).await;
        launched.shutdown().await;
        result
    }

    async fn drive(&self, launched: &LaunchedBrowser, ctx: &FetchContext) -> Result<Option<String>> {
        let page = launched
            .browser()
            .new_page("about:blank")
            .await
            .context("Failed to open page")?;
        configure_page(&page).await?;

        let page = BrowserPage::new(page, Fingerprint::default());
        if let Err(e) = page.apply_stealth().await {
            warn!("Stealth setup failed, navigating without it: {e:#}");
        }

        if !self.navigate(&page, ctx).await {
            return Ok(None);
        }

        let report = run_challenge_pipeline(&page, &self.evasion).await;
        debug!(?report, "Challenge pipeline finished");

        let html = page.html().await?;
        Ok(Some(html).filter(|html| !html.trim().is_empty()))
    }

    /// Navigate with linear backoff; `false` when every attempt failed
    async fn navigate(&self, page: &BrowserPage, ctx: &FetchContext) -> bool {
        for attempt in 1..=self.navigation_retries {
            let goto = async {
                page.inner()
                    .goto(ctx.url.as_str())
                    .await
                    .map(|_| ())
                    .map_err(anyhow::Error::from)
            };
            match with_timeout(goto, ctx.timeout, "Navigation").await {
                Ok(()) => {
                    info!(url = %ctx.url, attempt, "Browser navigation succeeded");
                    return true;
                }
                Err(e) => debug!(url = %ctx.url, attempt, "Navigation failed: {e:#}"),
            }
            if attempt < self.navigation_retries {
                sleep(self.navigation_backoff * u32::from(attempt)).await;
            }
        }
        warn!(url = %ctx.url, "Browser navigation failed after {} attempts", self.navigation_retries);
        false
    }
}

#[async_trait]
impl FetchStrategy for BrowserStrategy {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Option<String> {
        match self.fetch_with_browser(ctx).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %ctx.url, "Browser fetch failed: {e:#}");
                None
            }
        }
    }
}

/// Fixed desktop viewport and New York timezone
async fn configure_page(page: &Page) -> Result<()> {
    page.execute(
        cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(VIEWPORT_WIDTH))
            .height(i64::from(VIEWPORT_HEIGHT))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to set viewport")?;

    page.execute(cdp::browser_protocol::emulation::SetTimezoneOverrideParams::new(
        BROWSER_TIMEZONE,
    ))
    .await
    .context("Failed to set timezone")?;

    Ok(())
}

/// Bound an async browser operation
async fn with_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} seconds",
            timeout.as_secs()
        )),
    }
}
