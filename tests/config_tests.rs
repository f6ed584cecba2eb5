//! Configuration loading and its effect on the fetch chain

use std::collections::HashMap;
use std::time::Duration;

use stealthcrawl::{CrawlConfig, CrawlError, EvasionSettings, FetchChain, ProxySelector};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn browser_tier_is_opt_in() {
    let disabled = CrawlConfig::from_lookup(env(&[])).unwrap();
    assert_eq!(
        FetchChain::from_config(&disabled).strategy_names(),
        vec!["plain-client", "challenge-client"]
    );

    let enabled = CrawlConfig::from_lookup(env(&[("ENABLE_BROWSER_CRAWL", "1")])).unwrap();
    assert_eq!(
        FetchChain::from_config(&enabled).strategy_names(),
        vec!["plain-client", "challenge-client", "browser"]
    );
}

#[test]
fn headless_can_be_switched_off() {
    let config = CrawlConfig::from_lookup(env(&[("BROWSER_HEADLESS", "false")])).unwrap();
    assert!(!config.headless());
}

#[test]
fn explicit_overrides_win_over_environment() {
    let config = CrawlConfig::builder_from_lookup(env(&[
        ("CRAWL_TIMEOUT", "40"),
        ("PROXY_URL", "http://env-proxy.local:3128"),
    ]))
    .unwrap()
    .request_timeout_secs(7)
    .proxy_url(Some("socks5h://cli-proxy.local:1080".to_string()))
    .build()
    .unwrap();

    assert_eq!(config.request_timeout_secs(), 7);
    assert_eq!(config.request_timeout(), Duration::from_secs(7));
    assert_eq!(config.proxy_url(), Some("socks5h://cli-proxy.local:1080"));
}

#[test]
fn malformed_environment_is_a_configuration_error() {
    let bad_timeout = CrawlConfig::from_lookup(env(&[("CRAWL_TIMEOUT", "soon")]));
    assert!(matches!(bad_timeout, Err(CrawlError::ConfigError(_))));

    let bad_proxy = CrawlConfig::from_lookup(env(&[("PROXY_URL", "proxy.local:3128")]));
    assert!(matches!(bad_proxy, Err(CrawlError::ConfigError(_))));

    let bad_pool = CrawlConfig::from_lookup(env(&[(
        "PROXY_LIST",
        "http://ok.local:8080,gopher://old.local:70",
    )]));
    assert!(matches!(bad_pool, Err(CrawlError::ConfigError(_))));
}

#[test]
fn blank_proxy_url_means_direct() {
    let config = CrawlConfig::from_lookup(env(&[("PROXY_URL", "  ")])).unwrap();
    assert!(ProxySelector::from_config(&config).is_direct());
}

#[test]
fn rotating_pool_feeds_the_selector() {
    let config = CrawlConfig::from_lookup(env(&[
        ("PROXY_LIST", "http://a.local:1,http://b.local:2"),
        ("ROTATE_PROXIES", "on"),
    ]))
    .unwrap();

    let selector = ProxySelector::from_config(&config);
    for _ in 0..20 {
        let proxy = selector.select().unwrap();
        assert!(proxy == "http://a.local:1" || proxy == "http://b.local:2");
    }
}

#[test]
fn evasion_timings_can_be_tuned() {
    let config = CrawlConfig::builder()
        .cloudflare_timeout(Duration::from_secs(5))
        .captcha_timeout(Duration::from_secs(8))
        .build()
        .unwrap();

    assert_eq!(config.evasion().cloudflare_timeout, Duration::from_secs(5));
    assert_eq!(config.evasion().captcha_timeout, Duration::from_secs(8));
    assert_eq!(
        config.evasion().poll_interval,
        EvasionSettings::default().poll_interval
    );
}

#[test]
fn config_survives_a_json_round_trip() {
    let config = CrawlConfig::builder()
        .browser_enabled(true)
        .proxy_list(vec!["http://p.local:8080".to_string()])
        .rotate_proxies(true)
        .navigation_retries(5)
        .navigation_backoff_ms(250)
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let restored: CrawlConfig = serde_json::from_str(&json).unwrap();

    assert!(restored.browser_enabled());
    assert!(restored.rotate_proxies());
    assert_eq!(restored.proxy_list(), config.proxy_list());
    assert_eq!(restored.navigation_retries(), 5);
    assert_eq!(restored.navigation_backoff(), Duration::from_millis(250));
    assert_eq!(restored.evasion(), config.evasion());
}
