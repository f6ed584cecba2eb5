//! Captcha classification and best-effort resolution
//!
//! Resolution never talks to a solving service. Invisible captchas are waited
//! out; checkbox captchas get a hesitation, one click on the checkbox area of
//! their iframe, then a bounded wait for the widget to go away.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::page::ChallengePage;
use super::{EvasionSettings, random_delay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptchaKind {
    RecaptchaV2,
    RecaptchaV3,
    Hcaptcha,
    Turnstile,
    None,
}

impl CaptchaKind {
    /// Selector of the element carrying the widget, in detection order
    fn selector(self) -> Option<&'static str> {
        match self {
            Self::RecaptchaV2 => Some(r#"iframe[src*="recaptcha/api2"]"#),
            Self::RecaptchaV3 => Some(r#"script[src*="recaptcha/api.js"]"#),
            Self::Hcaptcha => Some(r#"iframe[src*="hcaptcha"]"#),
            Self::Turnstile => Some(
                r#"iframe[src*="turnstile"], iframe[src*="challenges.cloudflare.com"]"#,
            ),
            Self::None => None,
        }
    }

    /// Query parameter holding the site key
    fn site_key_param(self) -> Option<&'static str> {
        match self {
            Self::RecaptchaV2 => Some("k"),
            Self::Hcaptcha | Self::Turnstile => Some("sitekey"),
            Self::RecaptchaV3 | Self::None => None,
        }
    }

    /// Whether the widget shows a checkbox to click
    #[must_use]
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::RecaptchaV2 | Self::Hcaptcha | Self::Turnstile)
    }
}

const DETECTION_ORDER: [CaptchaKind; 4] = [
    CaptchaKind::RecaptchaV2,
    CaptchaKind::RecaptchaV3,
    CaptchaKind::Hcaptcha,
    CaptchaKind::Turnstile,
];

static DETECTION_SELECTORS: LazyLock<Vec<(CaptchaKind, Selector)>> = LazyLock::new(|| {
    DETECTION_ORDER
        .iter()
        .filter_map(|kind| {
            let css = kind.selector()?;
            let selector = Selector::parse(css)
                .unwrap_or_else(|_| panic!("BUG: hardcoded CSS selector '{css}' is invalid"));
            Some((*kind, selector))
        })
        .collect()
});

/// Classification of the captcha present on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaInfo {
    pub detected: bool,
    #[serde(rename = "type")]
    pub kind: CaptchaKind,
    pub site_key: Option<String>,
}

impl CaptchaInfo {
    #[must_use]
    pub fn none() -> Self {
        Self {
            detected: false,
            kind: CaptchaKind::None,
            site_key: None,
        }
    }
}

/// Classify the captcha in `html`; the first matching kind wins
#[must_use]
pub fn detect_captcha(html: &str) -> CaptchaInfo {
    let document = Html::parse_document(html);

    for (kind, selector) in DETECTION_SELECTORS.iter() {
        let Some(element) = document.select(selector).next() else {
            continue;
        };
        let site_key = kind
            .site_key_param()
            .zip(element.value().attr("src"))
            .and_then(|(param, src)| query_value(src, param));
        return CaptchaInfo {
            detected: true,
            kind: *kind,
            site_key,
        };
    }

    CaptchaInfo::none()
}

/// Value of `param` in the query or fragment of `src`
fn query_value(src: &str, param: &str) -> Option<String> {
    let (_, tail) = src.split_once(['?', '#'])?;
    tail.split(['&', '#', '?'])
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// Checkbox position inside a widget iframe
///
/// All three checkbox widgets draw the box near the left edge, vertically
/// centred in a ~74px tall frame.
const CHECKBOX_OFFSET: (f64, f64) = (28.0, 30.0);

/// Try to make the captcha described by `info` go away
///
/// Returns `true` when there was nothing to do, for invisible captchas after
/// their fixed wait, or when re-detection stops finding the widget before
/// `captcha_timeout`.
pub async fn resolve_captcha<P>(page: &P, info: &CaptchaInfo, settings: &EvasionSettings) -> bool
where
    P: ChallengePage + ?Sized,
{
    if !info.detected {
        return true;
    }
    info!(kind = ?info.kind, "Attempting captcha auto-resolution");

    if !info.kind.is_interactive() {
        debug!(
            "Invisible captcha, waiting {:?} for background processing",
            settings.invisible_captcha_wait
        );
        sleep(settings.invisible_captcha_wait).await;
        return true;
    }

    sleep(random_delay(settings.human_delay_ms)).await;
    click_checkbox(page, info.kind).await;

    let deadline = Instant::now() + settings.captcha_timeout;
    loop {
        match page.html().await {
            Ok(html) if !detect_captcha(&html).detected => {
                info!("Captcha cleared");
                return true;
            }
            Ok(_) => {}
            Err(e) => debug!("Page content unavailable while waiting: {e:#}"),
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        sleep(settings.poll_interval.min(deadline - now)).await;
    }

    warn!(
        "Captcha auto-resolution timed out after {:?}",
        settings.captcha_timeout
    );
    false
}

async fn click_checkbox<P>(page: &P, kind: CaptchaKind)
where
    P: ChallengePage + ?Sized,
{
    let Some(selector) = kind.selector() else {
        return;
    };
    let frame = match page.frame_box(selector).await {
        Ok(Some(frame)) => frame,
        Ok(None) => {
            debug!("Captcha iframe not found, skipping click");
            return;
        }
        Err(e) => {
            debug!("Captcha iframe not measurable: {e:#}");
            return;
        }
    };

    let x = frame.x + CHECKBOX_OFFSET.0.min(frame.width / 2.0);
    let y = frame.y + CHECKBOX_OFFSET.1.min(frame.height / 2.0);
    match page.click(x, y).await {
        Ok(()) => info!("Clicked captcha checkbox"),
        Err(e) => debug!("Checkbox click failed: {e:#}"),
    }
}
