//! Configuration module for crawling
//!
//! This module provides the `CrawlConfig` struct, its builder and the
//! environment loader, with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::CrawlConfigBuilder;
pub use types::CrawlConfig;
