//! Category listing traversal.
//!
//! Listing pages follow WordPress pagination: page 1 is the category URL
//! itself and page `N > 1` lives at `{category}/page/{N}`. Every page is
//! fetched in order and the article anchors on it are collected.

use super::SiteProfile;
use crate::error::ScrapeError;
use crate::fetcher::FetchPage;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Address of listing page `page` (1-based) under `base_url`.
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        format!("{}/page/{}", base_url.trim_end_matches('/'), page)
    }
}

/// Collect the `href` of every anchor matching `selector`.
///
/// Absolute links come back exactly as written. Relative links are resolved
/// against `page_url`. Anchors without `href`, empty or fragment-only hrefs,
/// and relative links pointing back at the listing page itself are skipped.
pub fn extract_links(document: &Html, selector: &Selector, page_url: &str) -> Vec<String> {
    let base = Url::parse(page_url).ok();
    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(href.trim(), base.as_ref()))
        .collect()
}

fn resolve_href(href: &str, base: Option<&Url>) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    let Some(base) = base else {
        return Some(href.to_string());
    };
    match base.join(href) {
        Ok(resolved) if without_fragment(&resolved) == without_fragment(base) => None,
        Ok(resolved) => Some(resolved.to_string()),
        Err(_) => Some(href.to_string()),
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Walk `page_count` listing pages and return every article URL found, in
/// page order.
///
/// No deduplication is done. A page without matches contributes nothing.
///
/// # Errors
///
/// The first listing page that fails to fetch aborts the traversal.
#[instrument(level = "info", skip(fetcher, profile))]
pub async fn list_urls<F: FetchPage>(
    fetcher: &F,
    profile: &SiteProfile,
    base_url: &str,
    page_count: u32,
) -> Result<Vec<String>, ScrapeError> {
    let mut all_urls = Vec::new();

    for page in 1..=page_count {
        let url = page_url(base_url, page);
        debug!(page, %url, "Fetching listing page");

        let document = fetcher.fetch(&url).await?;
        let page_urls = extract_links(&document, &profile.listing_links, &url);
        info!(page, count = page_urls.len(), "Found articles on listing page");

        all_urls.extend(page_urls);
    }

    info!(total = all_urls.len(), pages = page_count, "Indexed article URLs");
    Ok(all_urls)
}
