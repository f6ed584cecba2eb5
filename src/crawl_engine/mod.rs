//! Crawl Engine Module
//!
//! The breadth-first controller that drives the fetch chain and the HTML
//! extractor across a bounded frontier.

pub mod crawl_types;
pub mod crawler;
pub mod frontier;
pub mod link_processor;

pub use crawl_types::{
    CrawlError, CrawlLimits, CrawlOutcome, CrawlResult, CrawlStats, FrontierEntry,
};
pub use crawler::{Crawler, crawl_website, validate_start_url};
pub use frontier::Frontier;
pub use link_processor::enqueue_links;
