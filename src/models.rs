//! Data models for scraped articles and the batches they are collected into.
//!
//! - [`ArticleRecord`]: one article as written to the CSV table
//! - [`FailedArticle`]: a URL whose extraction failed, with the cause
//! - [`ScrapeBatch`]: everything one category run produced
//!
//! The field order of [`ArticleRecord`] is the column order of the output
//! file, so it must stay `title`, `subtitle`, `content`.

use serde::{Deserialize, Serialize};

/// An article as extracted from a single page.
///
/// Any field may be empty: a page that loaded but lacks a heading, lead
/// paragraph or body still produces a record. `content` holds one line per
/// paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Text of the first `<h1>` on the page.
    pub title: String,
    /// Text of the lead paragraph.
    pub subtitle: String,
    /// Body paragraphs joined with `\n`.
    pub content: String,
}

/// A URL that could not be turned into an [`ArticleRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedArticle {
    pub url: String,
    /// Rendered error, kept as text so the batch stays `Clone`.
    pub cause: String,
}

/// The result of one category run.
///
/// `records` are in completion order of the concurrent extractions, not in
/// listing order. Failures are kept for reporting only and never written out.
#[derive(Debug, Clone, Default)]
pub struct ScrapeBatch {
    pub records: Vec<ArticleRecord>,
    pub failures: Vec<FailedArticle>,
}

impl ScrapeBatch {
    /// Number of URLs the batch accounts for, successful or not.
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
