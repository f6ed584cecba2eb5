// stealthcrawl: crawl one site and print the extracted pages as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stealthcrawl::utils::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
use stealthcrawl::{CrawlConfig, CrawlError, crawl_website};

#[derive(Debug, Parser)]
#[command(
    name = "stealthcrawl",
    version,
    about = "Breadth-first crawler with HTTP and browser fallbacks"
)]
struct Cli {
    /// Start URL (http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Page budget, clamped to 1..=25
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Link hops from the start URL, clamped to 0..=3
    #[arg(long, value_name = "D", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u8,

    /// Per-request timeout in seconds; defaults to CRAWL_TIMEOUT or 15
    #[arg(long, value_name = "S")]
    timeout: Option<u64>,

    /// Enable the browser-automation tier
    #[arg(long, default_value_t = false)]
    browser: bool,

    /// Single proxy URL, overrides PROXY_URL
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,
}

const EXIT_CONFIG_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stealthcrawl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if matches!(e.downcast_ref::<CrawlError>(), Some(CrawlError::ConfigError(_))) {
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut builder = CrawlConfig::builder_from_lookup(|key| std::env::var(key).ok())?;
    if cli.browser {
        builder = builder.browser_enabled(true);
    }
    if let Some(proxy) = cli.proxy {
        builder = builder.proxy_url(Some(proxy));
    }
    if let Some(secs) = cli.timeout {
        builder = builder.request_timeout_secs(secs);
    }
    let config = builder.build()?;

    let timeout = Duration::from_secs(config.request_timeout_secs());
    let pages = crawl_website(&cli.url, cli.max_pages, cli.max_depth, timeout, &config).await?;

    if pages.is_empty() {
        eprintln!("no crawlable pages found at {}", cli.url);
    }

    let json = serde_json::to_string_pretty(&pages).context("Failed to serialize pages")?;
    println!("{json}");
    Ok(())
}
