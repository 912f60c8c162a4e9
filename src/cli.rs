//! Command-line interface definitions for the O Eco scraper.
//!
//! Without arguments the scraper runs the configured categories (by default
//! `noticias` and `reportagens`, five pages each) and writes one CSV per
//! category into `Data/news_data`.

use crate::config::{Category, ScraperConfig};
use crate::error::ScrapeError;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Default categories into ./Data/news_data
/// oeco_scraper
///
/// # A single listing, two pages, eight concurrent fetches
/// oeco_scraper --url https://oeco.org.br/category/noticias -p 2 -w 8
///
/// # Custom categories and selectors
/// oeco_scraper -c scraper.yaml -o /srv/chatbot/news_data
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "OECO_SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the CSV files are written to
    #[arg(short, long, env = "NEWS_DATA_DIR", default_value = "Data/news_data")]
    pub output_dir: PathBuf,

    /// Scrape only this listing URL instead of the configured categories
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output filename for --url; configured categories name their own files
    #[arg(short, long, requires = "url", default_value = crate::outputs::csv::DEFAULT_FILENAME)]
    pub filename: String,

    /// Listing pages to walk, overriding every category
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Concurrent article fetches (default: 4 per logical CPU)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Retries per failed fetch, with exponential backoff
    #[arg(long, default_value_t = 0)]
    pub retries: usize,
}

impl Cli {
    /// Apply `--url` and `--pages` on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ScraperConfig) -> Result<(), ScrapeError> {
        if let Some(url) = &self.url {
            config.categories = vec![Category {
                name: "cli".to_string(),
                url: url.clone(),
                pages: self.pages.unwrap_or(crate::config::DEFAULT_PAGES),
                filename: self.filename.clone(),
            }];
        }
        if let Some(pages) = self.pages {
            for category in &mut config.categories {
                category.pages = pages;
            }
        }
        if config.categories.is_empty() {
            return Err(ScrapeError::Config("nothing to scrape".to_string()));
        }
        Ok(())
    }
}
