//! Small helpers shared across the pipeline.
//!
//! - Worker pool sizing for the I/O-bound extraction phase
//! - String truncation for log fields
//! - File system validation for the output directory

use std::path::Path;
use std::thread;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Concurrent extractions per logical CPU.
///
/// Workers spend nearly all their time waiting on the network.
const WORKERS_PER_CPU: usize = 4;

/// Default number of concurrent article extractions: four per logical CPU.
pub fn default_worker_count() -> usize {
    let cpus = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus * WORKERS_PER_CPU
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` bytes are cut at the nearest character boundary
/// at or below `max` and get `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Scratch file created by [`ensure_writable_dir`].
pub const WRITE_CHECK_FILE: &str = ".oeco_write_check";

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes
/// [`WRITE_CHECK_FILE`] inside it. A leftover check file is only logged.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path).await?;
    let check_path = path.join(WRITE_CHECK_FILE);
    fs::File::create(&check_path).await?;
    if let Err(e) = fs::remove_file(&check_path).await {
        warn!(file = %check_path.display(), error = %e, "Could not remove write check file");
    }
    info!("Output directory is writable");
    Ok(())
}
