//! Scraper configuration: target categories, site selectors and User-Agent.
//!
//! Configuration comes from an optional YAML file. Every key is optional and
//! falls back to the built-in O Eco defaults, so an empty file is valid.
//!
//! ```yaml
//! user_agent: "Mozilla/5.0 ..."
//! site:
//!   listing_links: 'div[class="d-none d-md-block col-md-4"] > a'
//! categories:
//!   - name: noticias
//!     url: https://oeco.org.br/category/noticias
//!     pages: 5
//!     filename: news_results.csv
//! ```

use crate::error::ScrapeError;
use crate::fetcher::DEFAULT_USER_AGENT;
use crate::scrapers::SiteProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Listing pages walked per category when not configured.
pub const DEFAULT_PAGES: u32 = 5;

/// CSS selectors describing the target site's markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Anchors to article pages on a listing page.
    pub listing_links: String,
    pub title: String,
    pub subtitle: String,
    /// Body paragraphs of an article.
    pub content: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            listing_links: r#"div[class="d-none d-md-block col-md-4"] > a"#.to_string(),
            title: "h1".to_string(),
            subtitle: r#"p[class="lead font-italic mb-5"]"#.to_string(),
            content: r#"div[class="article"] > p"#.to_string(),
        }
    }
}

/// One listing to scrape and the file it ends up in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub name: String,
    /// Page 1 of the listing.
    pub url: String,
    #[serde(default = "default_pages")]
    pub pages: u32,
    pub filename: String,
}

fn default_pages() -> u32 {
    DEFAULT_PAGES
}

/// Complete scraper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub site: SiteSelectors,
    pub categories: Vec<Category>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            site: SiteSelectors::default(),
            categories: vec![
                Category {
                    name: "noticias".to_string(),
                    url: "https://oeco.org.br/category/noticias".to_string(),
                    pages: DEFAULT_PAGES,
                    filename: "news_results.csv".to_string(),
                },
                Category {
                    name: "reportagens".to_string(),
                    url: "https://oeco.org.br/category/reportagens".to_string(),
                    pages: DEFAULT_PAGES,
                    filename: "articles_results.csv".to_string(),
                },
            ],
        }
    }
}

impl ScraperConfig {
    /// Parse a YAML document, filling missing keys with defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScrapeError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ScrapeError> {
        let yaml = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&yaml)?;
        info!(categories = config.categories.len(), "Loaded configuration");
        Ok(config)
    }

    /// Check categories and compile the site selectors.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Config`] for an unusable category and
    /// [`ScrapeError::Selector`] for a selector that does not parse.
    pub fn validate(&self) -> Result<SiteProfile, ScrapeError> {
        if self.categories.is_empty() {
            return Err(ScrapeError::Config("no categories configured".to_string()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ScrapeError::Config("user_agent is empty".to_string()));
        }
        for category in &self.categories {
            category.validate()?;
        }
        let profile = SiteProfile::compile(&self.site)?;
        debug!(?self.site, "Compiled site selectors");
        Ok(profile)
    }
}

impl Category {
    fn validate(&self) -> Result<(), ScrapeError> {
        if self.pages == 0 {
            return Err(ScrapeError::Config(format!(
                "category `{}`: pages must be at least 1",
                self.name
            )));
        }
        if let Err(e) = Url::parse(&self.url) {
            return Err(ScrapeError::Config(format!(
                "category `{}`: invalid url `{}`: {e}",
                self.name, self.url
            )));
        }
        if self.filename.trim().is_empty() || self.filename.contains(['/', '\\']) {
            return Err(ScrapeError::Config(format!(
                "category `{}`: filename must be a plain file name, got `{}`",
                self.name, self.filename
            )));
        }
        Ok(())
    }
}
