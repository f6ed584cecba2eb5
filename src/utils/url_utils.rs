//! URL utilities for crawl-frontier bookkeeping.
//!
//! Every URL that enters the frontier or the visited set goes through
//! [`normalize_url`] first, so deduplication works on a single canonical form.

use url::Url;

/// Normalize a URL for deduplication.
///
/// Drops the fragment and the trailing slash of the path while keeping the
/// query string intact. Repeated trailing slashes collapse together so that
/// normalizing twice gives the same result.
///
/// # Examples
///
/// ```
/// use stealthcrawl::utils::normalize_url;
///
/// let normalized = normalize_url("https://example.com/docs/#intro").unwrap();
/// assert_eq!(normalized, "https://example.com/docs");
///
/// let with_query = normalize_url("https://example.com/search/?q=rust#top").unwrap();
/// assert_eq!(with_query, "https://example.com/search?q=rust");
/// ```
///
/// # Errors
///
/// Returns the parse error when `url` is not an absolute URL.
pub fn normalize_url(url: &str) -> Result<String, url::ParseError> {
    let mut parsed = Url::parse(url.trim())?;
    parsed.set_fragment(None);

    let query = parsed.query().filter(|q| !q.is_empty()).map(str::to_string);
    parsed.set_query(None);

    let mut normalized = parsed.as_str().trim_end_matches('/').to_string();
    if let Some(query) = query {
        normalized.push('?');
        normalized.push_str(&query);
    }
    Ok(normalized)
}

/// Resolve `href` against `base` and normalize it, keeping only http(s) targets.
#[must_use]
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let joined = base.join(href).ok()?;
    if !matches!(joined.scheme(), "http" | "https") {
        return None;
    }
    normalize_url(joined.as_str()).ok()
}

/// Network location (`host[:port]`) of a URL, as used for same-site checks.
#[must_use]
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}
