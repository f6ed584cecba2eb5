//! Test utilities shared by the stealthcrawl integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use stealthcrawl::{CrawlConfig, PageFetcher};

/// Route crate logs to the test harness; `RUST_LOG=stealthcrawl=debug` to see them
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a test HTML document with specified title and body markup
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A content page with a paragraph of text and one anchor per link
#[allow(dead_code)]
pub fn page_with_links(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}">{href}</a>"#))
        .collect::<Vec<_>>()
        .join("\n");
    create_test_html(title, &format!("<main><p>{text}</p>\n{anchors}</main>"))
}

/// Config for HTTP-only crawls that never waits on the challenge tier
#[allow(dead_code)]
pub fn http_only_config() -> CrawlConfig {
    CrawlConfig::builder()
        .browser_enabled(false)
        .challenge_delay_ms(0, 0)
        .request_timeout_secs(5)
        .build()
        .expect("static test config is valid")
}

/// Serves canned HTML per URL and records every request in order
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch_page_html(&self, url: &str, _timeout: Duration) -> Option<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned()
    }
}

/// Lets a test hand a borrowed fetcher to `Crawler::new`
#[allow(dead_code)]
pub struct Borrowed<'a, F>(pub &'a F);

#[async_trait]
impl<F: PageFetcher> PageFetcher for Borrowed<'_, F> {
    async fn fetch_page_html(&self, url: &str, timeout: Duration) -> Option<String> {
        self.0.fetch_page_html(url, timeout).await
    }
}
