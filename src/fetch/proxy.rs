//! Per-attempt proxy selection

use rand::seq::IndexedRandom;

use crate::config::CrawlConfig;

/// Chooses the egress proxy for each fetch attempt
///
/// With rotation on and a non-empty pool, every call samples the pool
/// independently, so two attempts on the same page may leave through
/// different IPs. Otherwise the single proxy wins, then the first pool entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySelector {
    single: Option<String>,
    pool: Vec<String>,
    rotate: bool,
}

impl ProxySelector {
    #[must_use]
    pub fn new(single: Option<String>, pool: Vec<String>, rotate: bool) -> Self {
        Self {
            single,
            pool,
            rotate,
        }
    }

    #[must_use]
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(
            config.proxy_url().map(str::to_string),
            config.proxy_list().to_vec(),
            config.rotate_proxies(),
        )
    }

    /// Proxy URL for the next attempt, `None` for a direct connection
    #[must_use]
    pub fn select(&self) -> Option<String> {
        if self.rotate
            && let Some(proxy) = self.pool.choose(&mut rand::rng())
        {
            return Some(proxy.clone());
        }
        self.single
            .clone()
            .or_else(|| self.pool.first().cloned())
    }

    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.single.is_none() && self.pool.is_empty()
    }
}
