pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod evasion;
pub mod fetch;
pub mod ingest;
pub mod page_extractor;
pub mod utils;

pub use browser_setup::{
    LaunchOptions, LaunchedBrowser, download_managed_browser, find_browser_executable,
    launch_browser,
};
pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use crawl_engine::{
    CrawlError, CrawlLimits, CrawlOutcome, CrawlResult, CrawlStats, Crawler, FrontierEntry,
    crawl_website,
};
pub use evasion::{
    CaptchaInfo, CaptchaKind, ChallengePage, ChallengeReport, EvasionSettings,
    is_cloudflare_challenge, run_challenge_pipeline,
};
pub use fetch::{FetchChain, FetchContext, FetchStrategy, PageFetcher, ProxySelector};
pub use ingest::{
    EmbeddingDecodeError, IngestReport, PageIngestor, decode_embedding, ingest_pages,
};
pub use page_extractor::schema::*;
pub use page_extractor::{extract_links, extract_page};

/// Crawl `start_url` with the default limits and the environment configuration
///
/// # Errors
///
/// `CrawlError::ConfigError` for an invalid start URL or invalid proxy
/// settings in the environment.
pub async fn crawl(start_url: &str) -> CrawlResult<Vec<PageRecord>> {
    let config = CrawlConfig::from_env()?;
    let limits = CrawlLimits::default();
    crawl_website(
        start_url,
        limits.max_pages(),
        limits.max_depth(),
        config.request_timeout(),
        &config,
    )
    .await
}
