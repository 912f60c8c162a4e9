//! Scraping of O Eco category listings and article pages.
//!
//! A category run has two phases:
//!
//! 1. **Listing**: walk `page_count` listing pages and collect article URLs
//!    ([`listing`])
//! 2. **Extraction**: fetch every article concurrently and pull out title,
//!    subtitle and body ([`concurrent`] driving [`article`])
//!
//! # Site Profile
//!
//! The DOM shape of the target site is captured by [`SiteProfile`], compiled
//! once from the selector strings in [`crate::config::SiteSelectors`] and
//! shared by reference with every worker.
//!
//! | Field | Default selector |
//! |-------|------------------|
//! | listing links | `div[class="d-none d-md-block col-md-4"] > a` |
//! | title | `h1` |
//! | subtitle | `p[class="lead font-italic mb-5"]` |
//! | content | `div[class="article"] > p` |
//!
//! # Failure Handling
//!
//! A listing page that cannot be fetched aborts the category. An article that
//! cannot be fetched is logged and recorded as a failure in the batch; its
//! siblings keep going.

pub mod article;
pub mod concurrent;
pub mod listing;

use crate::config::SiteSelectors;
use crate::error::ScrapeError;
use scraper::Selector;

/// Compiled CSS selectors for one site layout.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub listing_links: Selector,
    pub title: Selector,
    pub subtitle: Selector,
    pub content: Selector,
}

impl SiteProfile {
    /// Compile every selector, failing on the first one that does not parse.
    pub fn compile(selectors: &SiteSelectors) -> Result<Self, ScrapeError> {
        Ok(Self {
            listing_links: parse_selector(&selectors.listing_links)?,
            title: parse_selector(&selectors.title)?,
            subtitle: parse_selector(&selectors.subtitle)?,
            content: parse_selector(&selectors.content)?,
        })
    }
}

fn parse_selector(raw: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(raw).map_err(|e| ScrapeError::Selector {
        selector: raw.to_string(),
        reason: e.to_string(),
    })
}
