//! CSV output consumed by the retrieval index and the dashboard.
//!
//! # Format
//!
//! - UTF-8, no byte-order mark
//! - Header row `title,subtitle,content`
//! - One row per article; fields with commas, quotes or newlines are quoted
//!
//! Every call replaces the file it targets.

use crate::error::ScrapeError;
use crate::models::ArticleRecord;
use crate::utils::ensure_writable_dir;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Filename used when none is configured.
pub const DEFAULT_FILENAME: &str = "news_results.csv";

/// Render `records` as CSV bytes with a header row.
pub fn to_csv_bytes(records: &[ArticleRecord]) -> Result<Vec<u8>, ScrapeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))
}

/// Write `records` to `{output_dir}/{filename}`.
///
/// An empty slice is a no-op: nothing is created and `Ok(None)` is returned.
/// Otherwise the directory is created if missing and the file overwritten.
///
/// # Returns
///
/// The path written, if any.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %filename))]
pub async fn save_results(
    records: &[ArticleRecord],
    output_dir: &Path,
    filename: &str,
) -> Result<Option<PathBuf>, ScrapeError> {
    if records.is_empty() {
        info!("No results to save");
        return Ok(None);
    }

    let bytes = to_csv_bytes(records)?;

    ensure_writable_dir(output_dir).await?;
    let path = output_dir.join(filename);
    fs::write(&path, bytes).await?;
    info!(path = %path.display(), rows = records.len(), "Saved results");

    Ok(Some(path))
}
