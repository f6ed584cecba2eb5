//! End-to-end crawls against a local mock site

use mockito::Matcher;
use std::collections::HashSet;
use std::time::Duration;

use stealthcrawl::{
    CrawlConfig, CrawlError, CrawlLimits, Crawler, FetchChain, PageFetcher, crawl_website,
};

mod common;
use common::{
    Borrowed, FakeSite, create_test_html, http_only_config, init_tracing, page_with_links,
};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn html_mock(
    server: &mut mockito::ServerGuard,
    path: &str,
    body: String,
    hits: usize,
) -> mockito::Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

#[tokio::test]
async fn single_page_budget_records_only_the_start_page() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let links: Vec<String> = (0..10).map(|i| format!("/p{i}")).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();

    let root = html_mock(
        &mut server,
        "/",
        page_with_links("Home", "Welcome to the test site.", &link_refs),
        1,
    )
    .await;
    let children = server
        .mock("GET", Matcher::Regex(r"^/p\d$".to_string()))
        .expect(0)
        .create_async()
        .await;

    let crawler = Crawler::new(FetchChain::from_config(&http_only_config()));
    let outcome = crawler
        .crawl(&format!("{}/", server.url()), CrawlLimits::new(1, 0, TIMEOUT))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.pages[0].depth, 0);
    assert_eq!(outcome.pages[0].title, "Home");
    assert_eq!(outcome.stats.enqueued, 0);
    root.assert_async().await;
    children.assert_async().await;
}

#[tokio::test]
async fn cross_domain_links_are_never_followed() {
    let mut server = mockito::Server::new_async().await;
    let root = html_mock(
        &mut server,
        "/",
        page_with_links(
            "Home",
            "Start here.",
            &[
                "/a",
                "/b",
                "/c",
                "https://other.example/x",
                "http://cdn.other.test/y",
            ],
        ),
        1,
    )
    .await;
    let mut leaves = Vec::new();
    for path in ["/a", "/b", "/c"] {
        leaves.push(html_mock(&mut server, path, page_with_links(path, "Leaf content.", &[]), 1).await);
    }

    let start = server.url();
    let pages = crawl_website(&start, 5, 1, TIMEOUT, &http_only_config())
        .await
        .unwrap();

    assert_eq!(pages.len(), 4);
    assert!(pages.iter().all(|p| p.url.starts_with(&start)));
    assert_eq!(pages[0].depth, 0);
    assert!(pages[1..].iter().all(|p| p.depth == 1));
    root.assert_async().await;
    for leaf in leaves {
        leaf.assert_async().await;
    }
}

#[tokio::test]
async fn blocked_site_yields_no_pages_after_every_http_attempt() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    // Three plain profiles plus one challenge-aware request
    let blocked = server
        .mock("GET", "/")
        .with_status(403)
        .with_header("content-type", "text/html")
        .with_body("<html><body><h1>Forbidden</h1></body></html>")
        .expect(4)
        .create_async()
        .await;

    let crawler = Crawler::new(FetchChain::from_config(&http_only_config()));
    let outcome = crawler
        .crawl(&server.url(), CrawlLimits::new(5, 1, TIMEOUT))
        .await
        .unwrap();

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.stats.fetched, 1);
    assert_eq!(outcome.stats.skipped_no_content, 1);
    blocked.assert_async().await;
}

#[tokio::test]
async fn challenge_page_is_never_accepted_as_content() {
    let mut server = mockito::Server::new_async().await;
    let challenge = create_test_html(
        "Just a moment...",
        "<div id=\"cf-challenge-running\">Checking your browser before accessing the site.</div>",
    );
    // Three plain profiles, then the challenge tier's request and its retry
    let mock = server
        .mock("GET", "/")
        .with_status(503)
        .with_header("content-type", "text/html")
        .with_body(challenge)
        .expect(5)
        .create_async()
        .await;

    let chain = FetchChain::from_config(&http_only_config());
    let html = chain.fetch_page_html(&server.url(), TIMEOUT).await;

    assert!(html.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn challenge_tier_recovers_when_plain_profiles_are_refused() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let refused = server
        .mock("GET", "/")
        .match_header("sec-fetch-mode", Matcher::Missing)
        .with_status(403)
        .with_body("denied")
        .expect(3)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/")
        .match_header("sec-fetch-mode", "navigate")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page_with_links("Docs", "Real documentation text.", &[]))
        .expect(1)
        .create_async()
        .await;

    let chain = FetchChain::from_config(&http_only_config());
    let html = chain.fetch_page_html(&server.url(), TIMEOUT).await.unwrap();

    assert!(html.contains("Real documentation text."));
    refused.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn challenge_tier_keeps_real_pages_that_load_cloudflare_assets() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let refused = server
        .mock("GET", "/")
        .match_header("sec-fetch-mode", Matcher::Missing)
        .with_status(403)
        .with_body("denied")
        .expect(3)
        .create_async()
        .await;
    let catalogue = create_test_html(
        "Catalogue",
        r#"<script src="https://cdnjs.cloudflare.com/ajax/libs/jquery/3.7.1/jquery.min.js"></script>
    <p>Real product catalogue text.</p>"#,
    );
    let served = server
        .mock("GET", "/")
        .match_header("sec-fetch-mode", "navigate")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(catalogue)
        .expect(1)
        .create_async()
        .await;

    let chain = FetchChain::from_config(&http_only_config());
    let html = chain.fetch_page_html(&server.url(), TIMEOUT).await;

    assert!(
        html.as_deref()
            .is_some_and(|h| h.contains("Real product catalogue text.")),
        "a 200 text/html page must be kept: {html:?}"
    );
    refused.assert_async().await;
    served.assert_async().await;
}

#[tokio::test]
async fn plain_requests_go_through_the_configured_proxy() {
    init_tracing();
    let mut proxy = mockito::Server::new_async().await;
    // Answers on behalf of an origin that does not resolve
    let forwarded = proxy
        .mock("GET", Matcher::Any)
        .match_header("host", "catalogue.stealthcrawl.invalid")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(page_with_links("Proxied", "Served via the proxy.", &[]))
        .expect(1)
        .create_async()
        .await;

    let config = CrawlConfig::builder()
        .browser_enabled(false)
        .challenge_delay_ms(0, 0)
        .proxy_url(Some(proxy.url()))
        .build()
        .unwrap();
    let chain = FetchChain::from_config(&config);
    let html = chain
        .fetch_page_html("http://catalogue.stealthcrawl.invalid/", TIMEOUT)
        .await;

    assert!(html.is_some_and(|h| h.contains("Served via the proxy.")));
    forwarded.assert_async().await;
}

#[tokio::test]
async fn rotating_pool_is_used_for_every_attempt() {
    let mut proxy = mockito::Server::new_async().await;
    // Three plain profiles plus the challenge-aware request, all proxied
    let refused = proxy
        .mock("GET", Matcher::Any)
        .match_header("host", "blocked.stealthcrawl.invalid")
        .with_status(403)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Forbidden</body></html>")
        .expect(4)
        .create_async()
        .await;

    let config = CrawlConfig::builder()
        .browser_enabled(false)
        .challenge_delay_ms(0, 0)
        .proxy_list(vec![proxy.url()])
        .rotate_proxies(true)
        .build()
        .unwrap();
    let chain = FetchChain::from_config(&config);
    let html = chain
        .fetch_page_html("http://blocked.stealthcrawl.invalid/", TIMEOUT)
        .await;

    assert!(html.is_none());
    refused.assert_async().await;
}

#[tokio::test]
async fn non_html_responses_are_rejected() {
    let mut server = mockito::Server::new_async().await;
    let json = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hello":"world"}"#)
        .expect(4)
        .create_async()
        .await;

    let pages = crawl_website(&server.url(), 5, 1, TIMEOUT, &http_only_config())
        .await
        .unwrap();

    assert!(pages.is_empty());
    json.assert_async().await;
}

#[tokio::test]
async fn invalid_start_url_fails_before_any_fetch() {
    let site = FakeSite::new();
    let crawler = Crawler::new(Borrowed(&site));

    for bad in ["ftp://example.com/", "not a url", "/relative/path"] {
        let result = crawler.crawl(bad, CrawlLimits::default()).await;
        assert!(
            matches!(result, Err(CrawlError::ConfigError(_))),
            "{bad} should be a configuration error"
        );
    }
    assert!(site.requests().is_empty());

    let result = crawl_website("ftp://example.com/", 5, 1, TIMEOUT, &http_only_config()).await;
    assert!(matches!(result, Err(CrawlError::ConfigError(_))));
}

#[tokio::test]
async fn depth_limit_stops_link_following() {
    let site = FakeSite::new()
        .with_page(
            "https://site.test",
            page_with_links("Root", "Root text.", &["/a"]),
        )
        .with_page(
            "https://site.test/a",
            page_with_links("A", "Depth one.", &["/a/b"]),
        )
        .with_page(
            "https://site.test/a/b",
            page_with_links("B", "Depth two.", &["/a/b/c"]),
        )
        .with_page(
            "https://site.test/a/b/c",
            page_with_links("C", "Depth three.", &[]),
        );

    let crawler = Crawler::new(Borrowed(&site));
    let outcome = crawler
        .crawl("https://site.test/", CrawlLimits::new(10, 2, TIMEOUT))
        .await
        .unwrap();

    let depths: Vec<(String, u8)> = outcome
        .pages
        .iter()
        .map(|p| (p.url.clone(), p.depth))
        .collect();
    assert_eq!(
        depths,
        vec![
            ("https://site.test".to_string(), 0),
            ("https://site.test/a".to_string(), 1),
            ("https://site.test/a/b".to_string(), 2),
        ]
    );
    assert!(!site.requests().contains(&"https://site.test/a/b/c".to_string()));
}

#[tokio::test]
async fn equivalent_urls_are_fetched_once() {
    let site = FakeSite::new()
        .with_page(
            "https://site.test",
            page_with_links(
                "Root",
                "Root text.",
                &["/docs", "/docs/", "/docs#intro", "https://site.test/", "/guide?page=2"],
            ),
        )
        .with_page(
            "https://site.test/docs",
            page_with_links("Docs", "Docs text.", &["/", "/guide?page=2#top"]),
        )
        .with_page(
            "https://site.test/guide?page=2",
            page_with_links("Guide", "Guide text.", &["/docs/"]),
        );

    let crawler = Crawler::new(Borrowed(&site));
    let outcome = crawler
        .crawl("https://site.test", CrawlLimits::new(25, 3, TIMEOUT))
        .await
        .unwrap();

    let requests = site.requests();
    let unique: HashSet<&String> = requests.iter().collect();
    assert_eq!(unique.len(), requests.len(), "duplicate fetches: {requests:?}");
    assert_eq!(outcome.pages.len(), 3);
    assert!(outcome.pages.len() <= 25);
}

#[tokio::test]
async fn pages_without_text_are_skipped_and_not_expanded() {
    let site = FakeSite::new().with_page(
        "https://site.test",
        r#"<html><head><script src="/bundle.js"></script></head>
        <body><script>window.location = "/app";</script><style>a { color: red; }</style>
        <nav>Menu</nav><a href="/hidden"></a></body></html>"#
            .to_string(),
    );

    let crawler = Crawler::new(Borrowed(&site));
    let outcome = crawler
        .crawl("https://site.test", CrawlLimits::new(5, 2, TIMEOUT))
        .await
        .unwrap();

    assert!(outcome.pages.is_empty());
    assert_eq!(outcome.stats.skipped_empty_text, 1);
    assert_eq!(site.requests(), vec!["https://site.test".to_string()]);
}

#[tokio::test]
async fn failed_children_shrink_the_result_without_aborting() {
    let site = FakeSite::new().with_page(
        "https://site.test",
        page_with_links("Root", "Root text.", &["/missing", "/also-missing"]),
    );

    let crawler = Crawler::new(Borrowed(&site));
    let outcome = crawler
        .crawl("https://site.test", CrawlLimits::new(5, 1, TIMEOUT))
        .await
        .unwrap();

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.stats.fetched, 3);
    assert_eq!(outcome.stats.skipped_no_content, 2);
}
