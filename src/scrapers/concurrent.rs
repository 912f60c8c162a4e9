//! Bounded concurrent extraction of article pages.

use super::SiteProfile;
use super::article::extract_article;
use crate::fetcher::FetchPage;
use crate::models::{FailedArticle, ScrapeBatch};
use crate::utils::default_worker_count;
use futures::stream::{self, StreamExt};
use std::pin::pin;
use tracing::{info, instrument, warn};

/// Extract every URL with at most `workers` fetches in flight.
///
/// `workers` defaults to [`default_worker_count`]; zero is treated as one.
/// URLs are pulled lazily, so only `workers` requests are ever open at once.
/// Records land in the batch in completion order. A failed article is logged,
/// recorded in [`ScrapeBatch::failures`] and never stops its siblings.
#[instrument(level = "info", skip_all, fields(total = urls.len()))]
pub async fn scrape_all<F: FetchPage>(
    fetcher: &F,
    profile: &SiteProfile,
    urls: Vec<String>,
    workers: Option<usize>,
) -> ScrapeBatch {
    let total = urls.len();
    let workers = workers.unwrap_or_else(default_worker_count).max(1);
    info!(workers, total, "Extracting articles");

    let mut results = pin!(
        stream::iter(urls)
            .map(move |url| async move {
                let result = extract_article(fetcher, profile, &url).await;
                (url, result)
            })
            .buffer_unordered(workers)
    );

    let mut batch = ScrapeBatch::default();
    let mut done = 0usize;
    while let Some((url, result)) = results.next().await {
        done += 1;
        match result {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(%url, error = %e, "Article extraction failed; skipping");
                batch.failures.push(FailedArticle {
                    url,
                    cause: e.to_string(),
                });
            }
        }
        info!(done, total, "Extraction progress");
    }

    info!(
        total,
        successful = batch.records.len(),
        failed = batch.failures.len(),
        "Completed article extraction"
    );
    batch
}
