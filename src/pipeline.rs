//! One category run: listing → concurrent extraction → CSV.

use crate::config::Category;
use crate::error::ScrapeError;
use crate::fetcher::FetchPage;
use crate::models::ScrapeBatch;
use crate::outputs::csv::save_results;
use crate::scrapers::SiteProfile;
use crate::scrapers::concurrent::scrape_all;
use crate::scrapers::listing::list_urls;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Collect every article of `category` into a batch.
///
/// # Errors
///
/// Fails only when a listing page cannot be fetched; article failures end up
/// in [`ScrapeBatch::failures`].
pub async fn scrape_category<F: FetchPage>(
    fetcher: &F,
    profile: &SiteProfile,
    category: &Category,
    workers: Option<usize>,
) -> Result<ScrapeBatch, ScrapeError> {
    let urls = list_urls(fetcher, profile, &category.url, category.pages).await?;
    Ok(scrape_all(fetcher, profile, urls, workers).await)
}

/// Outcome of [`run_category`].
#[derive(Debug)]
pub struct CategoryReport {
    pub batch: ScrapeBatch,
    /// Where the CSV went; `None` when nothing was extracted.
    pub path: Option<PathBuf>,
}

/// Scrape `category` and save its records under `output_dir`.
#[instrument(level = "info", skip(fetcher, profile, category), fields(category = %category.name))]
pub async fn run_category<F: FetchPage>(
    fetcher: &F,
    profile: &SiteProfile,
    category: &Category,
    output_dir: &Path,
    workers: Option<usize>,
) -> Result<CategoryReport, ScrapeError> {
    let batch = scrape_category(fetcher, profile, category, workers).await?;
    let path = save_results(&batch.records, output_dir, &category.filename).await?;
    info!(
        saved = batch.records.len(),
        failed = batch.failures.len(),
        "Category done"
    );
    Ok(CategoryReport { batch, path })
}
