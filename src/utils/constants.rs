//! Shared configuration constants for stealthcrawl
//!
//! Default values and limits used throughout the crate so the crawl
//! controller, the fetch tiers and the binary agree on the same numbers.

/// Default page budget for a single crawl invocation
pub const DEFAULT_MAX_PAGES: usize = 5;

/// Hard ceiling for the page budget accepted from callers
pub const MAX_PAGES_CEILING: usize = 25;

/// Default link-hop depth from the start URL
pub const DEFAULT_MAX_DEPTH: u8 = 1;

/// Hard ceiling for the crawl depth accepted from callers
pub const MAX_DEPTH_CEILING: u8 = 3;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Navigation attempts made by the browser tier before giving up
pub const DEFAULT_NAVIGATION_RETRIES: u8 = 3;

/// Base backoff between browser navigation attempts (multiplied by attempt number)
pub const DEFAULT_NAVIGATION_BACKOFF_MS: u64 = 2_000;

/// Randomized delay window applied before a challenge-aware request
pub const DEFAULT_CHALLENGE_DELAY_MS: (u64, u64) = (1_000, 3_000);

/// Fixed browser viewport
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Fixed browser locale, timezone and geolocation (New York)
pub const BROWSER_LOCALE: &str = "en-US";
pub const BROWSER_TIMEZONE: &str = "America/New_York";
pub const BROWSER_GEOLOCATION: (f64, f64) = (40.7128, -74.0060);

/// Chrome user agent string used by the challenge-aware client and the browser tier
///
/// Keep within a couple of major versions of current stable; stale versions are
/// themselves a bot signal.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Client hint brand list matching [`CHROME_USER_AGENT`]
pub const CHROME_SEC_CH_UA: &str =
    r#""Google Chrome";v="131", "Chromium";v="131", "Not_A Brand";v="24""#;
