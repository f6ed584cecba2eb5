//! Cloudflare interstitial detection and the wait-it-out loop

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::page::ChallengePage;
use super::{EvasionSettings, random_delay};

/// Lowercase phrases that only appear on challenge interstitials
const CHALLENGE_MARKERS: &[&str] = &[
    "cf-challenge",
    "cf-browser-verification",
    "challenge-platform",
    "just a moment",
    "checking your browser",
    "ddos protection by cloudflare",
];

static SCRIPT_SRC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script[src]").expect("BUG: hardcoded CSS selector 'script[src]' is invalid")
});

/// Whether `html` is (or embeds) a Cloudflare challenge
#[must_use]
pub fn is_cloudflare_challenge(html: &str) -> bool {
    let lowered = html.to_lowercase();
    if let Some(marker) = CHALLENGE_MARKERS.iter().find(|m| lowered.contains(*m)) {
        debug!("Cloudflare marker found: {marker}");
        return true;
    }

    // cheap pre-check before parsing
    if !lowered.contains("cloudflare") {
        return false;
    }
    Html::parse_document(html)
        .select(&SCRIPT_SRC_SELECTOR)
        .filter_map(|script| script.value().attr("src"))
        .any(|src| src.to_lowercase().contains("cloudflare"))
}

/// Wiggle the pointer like a person reading the interstitial
pub(crate) async fn human_pointer_moves<P>(page: &P, settings: &EvasionSettings)
where
    P: ChallengePage + ?Sized,
{
    if settings.pointer_moves == 0 {
        return;
    }
    let (width, height) = match page.viewport().await {
        Ok(dims) => dims,
        Err(e) => {
            debug!("Pointer movement skipped: {e:#}");
            return;
        }
    };

    for _ in 0..settings.pointer_moves {
        let (x, y) = random_point(width, height);
        if let Err(e) = page.move_pointer(x, y).await {
            debug!("Pointer movement skipped: {e:#}");
            return;
        }
        sleep(random_delay(settings.pointer_pause_ms)).await;
    }
}

/// Random point at least 100px away from the edges when the viewport allows
fn random_point(width: u32, height: u32) -> (f64, f64) {
    use rand::Rng;

    let axis = |extent: u32| -> f64 {
        if extent > 200 {
            f64::from(rand::rng().random_range(100..extent - 100))
        } else {
            f64::from(extent / 2)
        }
    };
    (axis(width), axis(height))
}

/// Try to get past a Cloudflare interstitial
///
/// Applies stealth, moves the pointer a few times, then polls once per
/// `poll_interval` until the markers disappear or a substantial body without
/// Cloudflare wording shows up. Returns `false` on timeout; callers go on with
/// whatever the page shows.
pub async fn bypass_cloudflare<P>(page: &P, settings: &EvasionSettings) -> bool
where
    P: ChallengePage + ?Sized,
{
    info!("Attempting Cloudflare bypass");

    if let Err(e) = page.apply_stealth().await {
        debug!("Stealth re-application failed: {e:#}");
    }
    human_pointer_moves(page, settings).await;

    let deadline = Instant::now() + settings.cloudflare_timeout;
    loop {
        match page.html().await {
            Ok(html) if !is_cloudflare_challenge(&html) => {
                info!("Cloudflare bypass successful");
                return true;
            }
            Ok(_) => {}
            Err(e) => debug!("Page content unavailable while waiting: {e:#}"),
        }

        if landed_on_content(page, settings).await {
            info!("Cloudflare bypass successful, content loaded");
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        sleep(settings.poll_interval.min(deadline - now)).await;
    }

    warn!(
        "Cloudflare bypass timed out after {:?}, continuing with current content",
        settings.cloudflare_timeout
    );
    false
}

/// Substantial body text outside any Cloudflare-hosted URL
async fn landed_on_content<P>(page: &P, settings: &EvasionSettings) -> bool
where
    P: ChallengePage + ?Sized,
{
    let on_cloudflare = page
        .current_url()
        .await
        .map(|url| url.to_lowercase().contains("cloudflare"))
        .unwrap_or(true);
    if on_cloudflare {
        return false;
    }
    match page.body_text().await {
        Ok(body) => {
            body.chars().count() > settings.min_body_chars
                && !body.to_lowercase().contains("cloudflare")
        }
        Err(_) => false,
    }
}
