use async_trait::async_trait;
use tracing::debug;

use super::headers::{HeaderProfile, PLAIN_PROFILES};
use super::{FetchContext, FetchStrategy, FetchedResponse, build_client};

/// First tier: one ordinary request per browser header profile
///
/// Each attempt gets a fresh client and a freshly selected proxy. A transport
/// error on one profile moves on to the next.
#[derive(Debug, Clone)]
pub struct PlainClientStrategy {
    profiles: &'static [HeaderProfile],
}

impl PlainClientStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::with_profiles(PLAIN_PROFILES)
    }

    #[must_use]
    pub fn with_profiles(profiles: &'static [HeaderProfile]) -> Self {
        Self { profiles }
    }

    async fn attempt(
        &self,
        ctx: &FetchContext,
        profile: &HeaderProfile,
    ) -> anyhow::Result<Option<String>> {
        let proxy = ctx.select_proxy();
        let client = build_client(profile, ctx.timeout, proxy.as_deref(), false)?;
        let response = client.get(&ctx.url).send().await?;
        Ok(FetchedResponse::read(response).await?.into_html())
    }
}

impl Default for PlainClientStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchStrategy for PlainClientStrategy {
    fn name(&self) -> &'static str {
        "plain-client"
    }

    async fn fetch(&self, ctx: &FetchContext) -> Option<String> {
        for profile in self.profiles {
            match self.attempt(ctx, profile).await {
                Ok(Some(html)) => return Some(html),
                Ok(None) => debug!(profile = profile.name, url = %ctx.url, "No usable HTML"),
                Err(e) => debug!(profile = profile.name, url = %ctx.url, "Request failed: {e:#}"),
            }
        }
        None
    }
}
