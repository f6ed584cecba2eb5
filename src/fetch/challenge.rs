use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info};

use super::headers::CHALLENGE_PROFILE;
use super::{FetchContext, FetchStrategy, FetchedResponse, build_client};
use crate::evasion::{is_cloudflare_challenge, random_delay};

/// Second tier: a cookie-keeping client with full Chromium client hints
///
/// Sleeps a random human-ish delay before the request. A 2xx HTML answer is
/// content even when it mentions Cloudflare. A refused answer that looks like
/// a Cloudflare interstitial gets one more request after another delay, with
/// whatever clearance cookies the first response set.
#[derive(Debug, Clone)]
pub struct ChallengeClientStrategy {
    delay_ms: (u64, u64),
}

impl ChallengeClientStrategy {
    #[must_use]
    pub fn new(delay_ms: (u64, u64)) -> Self {
        Self { delay_ms }
    }

    async fn attempt(&self, ctx: &FetchContext) -> anyhow::Result<Option<String>> {
        let proxy = ctx.select_proxy();
        let client = build_client(&CHALLENGE_PROFILE, ctx.timeout, proxy.as_deref(), true)?;

        sleep(random_delay(self.delay_ms)).await;
        let first = FetchedResponse::read(client.get(&ctx.url).send().await?).await?;
        if first.is_usable_html() {
            return Ok(Some(first.body));
        }
        if !is_cloudflare_challenge(&first.body) {
            debug!(url = %ctx.url, status = first.status.as_u16(), "Refused without a challenge");
            return Ok(None);
        }

        info!(url = %ctx.url, "Challenge page served, retrying with session cookies");
        sleep(random_delay(self.delay_ms)).await;
        let second = FetchedResponse::read(client.get(&ctx.url).send().await?).await?;
        if is_cloudflare_challenge(&second.body) && !second.is_usable_html() {
            debug!(url = %ctx.url, "Still challenged after retry");
        }
        Ok(second.into_html())
    }
}

#[async_trait]
impl FetchStrategy for ChallengeClientStrategy {
    fn name(&self) -> &'static str {
        "challenge-client"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Option<String> {
        match self.attempt(ctx).await {
            Ok(html) => html,
            Err(e) => {
                debug!(url = %ctx.url, "Challenge-aware request failed: {e:#}");
                None
            }
        }
    }
}
