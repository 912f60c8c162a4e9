//! # O Eco Scraper
//!
//! Collects environmental news from [O Eco](https://oeco.org.br) category
//! listings and writes them as CSV tables. The files feed a retrieval index
//! for a chat assistant and a word-cloud dashboard; both live elsewhere and
//! only read the CSV.
//!
//! ## Usage
//!
//! ```sh
//! oeco_scraper -o ./Data/news_data
//! ```
//!
//! ## Architecture
//!
//! Each configured category goes through the same pipeline:
//! 1. **Listing**: walk the paginated category and collect article URLs
//! 2. **Extraction**: fetch and parse articles concurrently (4 per CPU by default)
//! 3. **Output**: write `title,subtitle,content` rows to a CSV file
//!
//! A listing page that cannot be fetched stops the run with an error.
//! Articles that fail are logged and left out of the CSV.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScraperConfig;
use fetcher::{HttpFetcher, RetryFetch};
use pipeline::run_category;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("oeco_scraper starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path).await?,
        None => ScraperConfig::default(),
    };
    args.apply_overrides(&mut config)?;
    let profile = match config.validate() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    let fetcher = RetryFetch::new(
        HttpFetcher::new(&config.user_agent)?,
        args.retries,
        Duration::from_secs(1),
    );
    info!(
        categories = config.categories.len(),
        output_dir = %args.output_dir.display(),
        retries = args.retries,
        "Starting scrape"
    );

    // ---- Scrape each category ----
    let mut total_saved = 0usize;
    let mut total_failed = 0usize;
    for category in &config.categories {
        info!(category = %category.name, url = %category.url, pages = category.pages, "Scraping category");

        let report = match run_category(&fetcher, &profile, category, &args.output_dir, args.workers).await {
            Ok(report) => report,
            Err(e) => {
                error!(
                    category = %category.name,
                    http = e.is_http(),
                    error = %e,
                    "Category scrape failed; aborting run"
                );
                return Err(e.into());
            }
        };

        info!(
            category = %category.name,
            attempted = report.batch.attempted(),
            saved = report.batch.records.len(),
            "Category extraction summary"
        );
        total_saved += report.batch.records.len();
        total_failed += report.batch.failures.len();
        if report.batch.is_empty() {
            info!(category = %category.name, "Category produced no articles");
        } else if let Some(path) = &report.path {
            info!(category = %category.name, path = %path.display(), "Wrote category CSV");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        saved = total_saved,
        failed = total_failed,
        "Execution complete"
    );

    Ok(())
}
