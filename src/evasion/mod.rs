//! Anti-bot evasion for the browser fetch tier
//!
//! Everything here operates on an already-open page through the
//! [`ChallengePage`] seam. Detection is pure over markup; the bypass and
//! resolution loops are heuristic and bounded in time. A failed bypass is
//! never an error: the caller reads whatever content the page has.

pub mod captcha;
pub mod cloudflare;
pub mod fingerprint;
pub mod page;
pub mod stealth;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub use captcha::{CaptchaInfo, CaptchaKind, detect_captcha, resolve_captcha};
pub use cloudflare::{bypass_cloudflare, is_cloudflare_challenge};
pub use fingerprint::Fingerprint;
pub use page::{BrowserPage, ChallengePage, FrameBox};
pub use stealth::{apply_stealth, stealth_script};

/// Timings of the Cloudflare and captcha loops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvasionSettings {
    /// Ceiling of the Cloudflare wait loop
    pub cloudflare_timeout: Duration,
    /// Ceiling of the captcha re-detection loop
    pub captcha_timeout: Duration,
    /// Sleep between two polls of either loop
    pub poll_interval: Duration,
    /// Fixed wait for self-resolving captchas (reCAPTCHA v3)
    pub invisible_captcha_wait: Duration,
    /// Body text longer than this without challenge markers counts as cleared
    pub min_body_chars: usize,
    /// Random pointer movements performed before waiting on Cloudflare
    pub pointer_moves: usize,
    /// Inclusive pause window between two pointer movements, in ms
    pub pointer_pause_ms: (u64, u64),
    /// Inclusive hesitation window before touching a captcha checkbox, in ms
    pub human_delay_ms: (u64, u64),
}

impl Default for EvasionSettings {
    fn default() -> Self {
        Self {
            cloudflare_timeout: Duration::from_secs(30),
            captcha_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            invisible_captcha_wait: Duration::from_secs(3),
            min_body_chars: 500,
            pointer_moves: 3,
            pointer_pause_ms: (100, 300),
            human_delay_ms: (1000, 3000),
        }
    }
}

/// What the post-navigation pipeline saw and achieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeReport {
    pub cloudflare_detected: bool,
    /// `None` when no Cloudflare challenge was present
    pub cloudflare_cleared: Option<bool>,
    pub captcha: CaptchaInfo,
    /// `None` when no captcha was present
    pub captcha_resolved: Option<bool>,
}

impl Default for ChallengeReport {
    fn default() -> Self {
        Self {
            cloudflare_detected: false,
            cloudflare_cleared: None,
            captcha: CaptchaInfo::none(),
            captcha_resolved: None,
        }
    }
}

/// Run Cloudflare detect/bypass, then captcha detect/resolve, on a page that
/// has already been navigated
///
/// Stages whose input cannot be read are skipped with a log line. The report
/// is informational: the caller reads the page content either way.
pub async fn run_challenge_pipeline<P>(page: &P, settings: &EvasionSettings) -> ChallengeReport
where
    P: ChallengePage + ?Sized,
{
    let mut report = ChallengeReport::default();

    match page.html().await {
        Ok(html) if is_cloudflare_challenge(&html) => {
            info!("Cloudflare challenge detected");
            report.cloudflare_detected = true;
            report.cloudflare_cleared = Some(bypass_cloudflare(page, settings).await);
        }
        Ok(_) => {}
        Err(e) => debug!("Skipping Cloudflare stage, page content unavailable: {e:#}"),
    }

    match page.html().await {
        Ok(html) => {
            let info = detect_captcha(&html);
            if info.detected {
                info!(kind = ?info.kind, site_key = ?info.site_key, "Captcha detected");
                report.captcha_resolved = Some(resolve_captcha(page, &info, settings).await);
            }
            report.captcha = info;
        }
        Err(e) => debug!("Skipping captcha stage, page content unavailable: {e:#}"),
    }

    report
}

/// Uniform sample from an inclusive millisecond window
pub(crate) fn random_delay((min_ms, max_ms): (u64, u64)) -> Duration {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}
