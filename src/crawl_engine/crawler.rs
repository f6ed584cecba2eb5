//! Breadth-first crawl controller

use log::{debug, info, warn};
use std::time::Duration;
use url::Url;

use super::crawl_types::{
    CrawlError, CrawlLimits, CrawlOutcome, CrawlResult, CrawlStats, FrontierEntry,
};
use super::frontier::Frontier;
use super::link_processor::enqueue_links;
use crate::config::CrawlConfig;
use crate::fetch::{FetchChain, PageFetcher};
use crate::page_extractor::{PageRecord, extract_page_and_links};
use crate::utils::{netloc, normalize_url};

/// Sequential BFS crawler over a [`PageFetcher`]
///
/// One frontier entry is fetched and extracted completely before the next is
/// popped. Only an invalid start URL is an error; everything else shrinks the
/// result.
pub struct Crawler<F: PageFetcher> {
    fetcher: F,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Crawl from `start_url` within `limits`
    ///
    /// # Errors
    ///
    /// `CrawlError::ConfigError` when `start_url` is not an absolute http(s)
    /// URL with a host. No fetch happens in that case.
    pub async fn crawl(&self, start_url: &str, limits: CrawlLimits) -> CrawlResult<CrawlOutcome> {
        let start = validate_start_url(start_url)?;
        let site = netloc(&start).ok_or_else(|| {
            CrawlError::ConfigError(format!("Start URL has no host: {start_url}"))
        })?;
        let mut frontier = Frontier::new(FrontierEntry::new(normalize_url(start.as_str())?, 0));

        let mut pages: Vec<PageRecord> = Vec::new();
        let mut stats = CrawlStats::default();

        info!(
            target: "stealthcrawl::crawl",
            "Starting crawl of {} (max_pages={}, max_depth={})",
            start,
            limits.max_pages(),
            limits.max_depth()
        );

        while pages.len() < limits.max_pages() {
            let Some(entry) = frontier.pop() else {
                break;
            };
            if frontier.is_visited(&entry.url) || entry.depth > limits.max_depth() {
                continue;
            }
            frontier.mark_visited(&entry.url);
            stats.fetched += 1;

            let Some(html) = self
                .fetcher
                .fetch_page_html(&entry.url, limits.timeout())
                .await
            else {
                warn!(target: "stealthcrawl::crawl", "No content for {}, skipping", entry.url);
                stats.skipped_no_content += 1;
                continue;
            };

            let base = match Url::parse(&entry.url) {
                Ok(base) => base,
                Err(e) => {
                    warn!(target: "stealthcrawl::crawl", "Unparsable frontier URL {}: {e}", entry.url);
                    continue;
                }
            };
            let (extracted, links) = extract_page_and_links(&html, &base);

            if extracted.text.trim().is_empty() {
                debug!(target: "stealthcrawl::crawl", "No text on {}, skipping", entry.url);
                stats.skipped_empty_text += 1;
                continue;
            }

            pages.push(PageRecord::from_extracted(
                entry.url.clone(),
                entry.depth,
                extracted,
            ));
            info!(
                target: "stealthcrawl::crawl",
                "Recorded {} at depth {} ({}/{})",
                entry.url,
                entry.depth,
                pages.len(),
                limits.max_pages()
            );

            if entry.depth < limits.max_depth() {
                stats.enqueued +=
                    enqueue_links(&mut frontier, &links, &entry, &site, &limits, pages.len());
            }
        }

        info!(
            target: "stealthcrawl::crawl",
            "Crawl finished: {} pages, {} fetched, {} without content, {} without text",
            pages.len(),
            stats.fetched,
            stats.skipped_no_content,
            stats.skipped_empty_text
        );

        Ok(CrawlOutcome { pages, stats })
    }
}

/// Parse `start_url`, accepting only absolute http(s) URLs with a host
pub fn validate_start_url(start_url: &str) -> CrawlResult<Url> {
    let url = Url::parse(start_url.trim())
        .map_err(|e| CrawlError::ConfigError(format!("Invalid start URL '{start_url}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::ConfigError(format!(
            "Start URL must use http or https: {start_url}"
        )));
    }
    if url.host_str().is_none() {
        return Err(CrawlError::ConfigError(format!(
            "Start URL has no host: {start_url}"
        )));
    }
    Ok(url)
}

/// Crawl a site with the fetch chain described by `config`
///
/// `max_pages` is clamped to `[1, 25]` and `max_depth` to `[0, 3]`; `timeout`
/// bounds every single network call.
///
/// # Errors
///
/// `CrawlError::ConfigError` when `start_url` is not an http(s) URL. An empty
/// vector means nothing crawlable was found.
pub async fn crawl_website(
    start_url: &str,
    max_pages: usize,
    max_depth: u8,
    timeout: Duration,
    config: &CrawlConfig,
) -> CrawlResult<Vec<PageRecord>> {
    // Validate before building any HTTP client
    validate_start_url(start_url)?;

    let crawler = Crawler::new(FetchChain::from_config(config));
    let outcome = crawler
        .crawl(start_url, CrawlLimits::new(max_pages, max_depth, timeout))
        .await?;
    Ok(outcome.pages)
}
