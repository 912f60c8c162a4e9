//! Error taxonomy for the scraping pipeline.
//!
//! Listing-page failures surface to the caller as [`ScrapeError`] and abort
//! the category run. Per-article failures are produced with the same type but
//! are absorbed by the coordinator into [`crate::models::FailedArticle`]
//! entries, so they never reach `main`.

use thiserror::Error;

/// Every failure the scraper can report.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a 4xx or 5xx status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A CSS selector from the site profile does not parse.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("config file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// True for transport failures and error statuses, the class of errors a
    /// fetch can produce.
    pub fn is_http(&self) -> bool {
        matches!(self, ScrapeError::Request { .. } | ScrapeError::Status { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ScrapeError::Status {
            url: "https://example.org/news".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.is_http());
        assert_eq!(
            err.to_string(),
            "https://example.org/news returned HTTP 404 Not Found"
        );
    }

    #[test]
    fn test_config_errors_are_not_http() {
        let err = ScrapeError::Config("no categories".to_string());
        assert!(!err.is_http());

        let err = ScrapeError::Selector {
            selector: "div[".to_string(),
            reason: "unexpected end".to_string(),
        };
        assert!(!err.is_http());
        assert!(err.to_string().contains("div["));
    }
}
