//! HTML-to-record extraction
//!
//! Pure functions over raw HTML: no network, no browser. The crawl controller
//! runs them on whatever markup the fetch chain returned.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::images::collect_images;
use super::schema::ExtractedPage;
use crate::utils::resolve_link;

// Hardcoded selectors should NEVER fail to parse - if they do, it's a compile-time bug.
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// Elements whose text never reaches the extracted body text
const EXCLUDED_TEXT_CONTAINERS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "iframe",
];

/// Extract title, plain text and ranked content images from `html`
///
/// Relative image URLs are resolved against `base_url`.
#[must_use]
pub fn extract_page(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);
    ExtractedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        images: collect_images(&document, base_url),
    }
}

/// Extract the page and its outgoing links from a single parse
#[must_use]
pub fn extract_page_and_links(html: &str, base_url: &Url) -> (ExtractedPage, Vec<String>) {
    let document = Html::parse_document(html);
    let page = ExtractedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        images: collect_images(&document, base_url),
    };
    let links = extract_links_from(&document, base_url);
    (page, links)
}

/// Trimmed content of the first `<title>` element, or empty
#[must_use]
pub fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Visible text of the document, one trimmed non-empty line per row
#[must_use]
pub fn extract_text(document: &Html) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let excluded = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| EXCLUDED_TEXT_CONTAINERS.contains(&el.name()))
        });
        if excluded {
            continue;
        }
        lines.extend(text.lines().map(str::trim).filter(|line| !line.is_empty()));
    }

    lines.join("\n")
}

/// Absolute, normalized http(s) link targets in document order, de-duplicated
#[must_use]
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_links_from(&document, base_url)
}

pub(crate) fn extract_links_from(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor: ElementRef<'_>| anchor.value().attr("href"))
        .filter_map(|href| resolve_link(base_url, href))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
