//! Link admission
//!
//! Decides which links discovered on a page make it into the frontier.

use log::{debug, trace};
use url::Url;

use super::crawl_types::{CrawlLimits, FrontierEntry};
use super::frontier::Frontier;
use crate::utils::netloc;

/// Enqueue same-site `links` found on `parent` at `parent.depth + 1`
///
/// Links are taken in document order. Admission stops as soon as queued plus
/// recorded pages reach the page budget; this is a soft bound, so entries
/// admitted earlier may still be skipped later. Returns the number admitted.
pub fn enqueue_links(
    frontier: &mut Frontier,
    links: &[String],
    parent: &FrontierEntry,
    site_netloc: &str,
    limits: &CrawlLimits,
    pages_recorded: usize,
) -> usize {
    if parent.depth >= limits.max_depth() {
        return 0;
    }
    let child_depth = parent.depth + 1;
    let mut admitted = 0;

    for link in links {
        if frontier.len() + pages_recorded >= limits.max_pages() {
            debug!(
                target: "stealthcrawl::links",
                "Page budget reached, not following further links from {}",
                parent.url
            );
            break;
        }

        if !is_same_site(link, site_netloc) {
            trace!(target: "stealthcrawl::links", "Skipping off-site link {link}");
            continue;
        }

        if frontier.push(FrontierEntry::new(link.clone(), child_depth)) {
            admitted += 1;
        }
    }

    debug!(
        target: "stealthcrawl::links",
        "Found {} links on {}, {} admitted at depth {}",
        links.len(),
        parent.url,
        admitted,
        child_depth
    );
    admitted
}

/// Exact network-location match against the start URL
fn is_same_site(link: &str, site_netloc: &str) -> bool {
    Url::parse(link)
        .ok()
        .and_then(|url| netloc(&url))
        .is_some_and(|candidate| candidate == site_netloc)
}
