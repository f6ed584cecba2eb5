//! The live-page seam used by the evasion loops

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::layout::Point;

use super::fingerprint::Fingerprint;
use super::stealth::apply_stealth;

/// Bounding box of an element in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// An open page the evasion engine can inspect and poke
#[async_trait]
pub trait ChallengePage: Send + Sync {
    /// Serialized DOM of the main frame
    async fn html(&self) -> Result<String>;

    /// Rendered text of `document.body`
    async fn body_text(&self) -> Result<String>;

    async fn current_url(&self) -> Result<String>;

    /// `(width, height)` of the layout viewport
    async fn viewport(&self) -> Result<(u32, u32)>;

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()>;

    async fn click(&self, x: f64, y: f64) -> Result<()>;

    /// Box of the first element matching `selector`, `None` when absent
    async fn frame_box(&self, selector: &str) -> Result<Option<FrameBox>>;

    /// (Re)apply fingerprint overrides; idempotent
    async fn apply_stealth(&self) -> Result<()>;
}

/// A chromiumoxide page plus the fingerprint it presents
pub struct BrowserPage {
    page: Page,
    fingerprint: Fingerprint,
}

impl BrowserPage {
    #[must_use]
    pub fn new(page: Page, fingerprint: Fingerprint) -> Self {
        Self { page, fingerprint }
    }

    #[must_use]
    pub fn inner(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

const BODY_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";
const VIEWPORT_SCRIPT: &str = "[window.innerWidth, window.innerHeight]";

#[async_trait]
impl ChallengePage for BrowserPage {
    async fn html(&self) -> Result<String> {
        self.page.content().await.context("Failed to read page content")
    }

    async fn body_text(&self) -> Result<String> {
        let result = self
            .page
            .evaluate(BODY_TEXT_SCRIPT)
            .await
            .context("Failed to evaluate body text")?;
        Ok(result.into_value::<String>().unwrap_or_default())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .page
            .url()
            .await
            .context("Failed to read page URL")?
            .unwrap_or_default())
    }

    async fn viewport(&self) -> Result<(u32, u32)> {
        let result = self
            .page
            .evaluate(VIEWPORT_SCRIPT)
            .await
            .context("Failed to evaluate viewport size")?;
        let dims: Vec<f64> = result
            .into_value()
            .context("Viewport size is not a numeric pair")?;
        match dims.as_slice() {
            [w, h] if *w > 0.0 && *h > 0.0 => Ok((*w as u32, *h as u32)),
            _ => Ok((self.fingerprint.screen_width, self.fingerprint.screen_height)),
        }
    }

    async fn move_pointer(&self, x: f64, y: f64) -> Result<()> {
        self.page
            .move_mouse(Point::new(x, y))
            .await
            .context("Failed to move pointer")?;
        Ok(())
    }

    async fn click(&self, x: f64, y: f64) -> Result<()> {
        self.page
            .click(Point::new(x, y))
            .await
            .context("Failed to click")?;
        Ok(())
    }

    async fn frame_box(&self, selector: &str) -> Result<Option<FrameBox>> {
        // find_element errors when nothing matches
        let Ok(element) = self.page.find_element(selector).await else {
            return Ok(None);
        };
        let bbox = element
            .bounding_box()
            .await
            .with_context(|| format!("Failed to measure element '{selector}'"))?;
        Ok(Some(FrameBox {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
        }))
    }

    async fn apply_stealth(&self) -> Result<()> {
        apply_stealth(&self.page, &self.fingerprint).await
    }
}
