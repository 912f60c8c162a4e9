//! Page fetching with an optional exponential-backoff retry decorator.
//!
//! # Architecture
//!
//! - [`FetchPage`]: core trait, GET a URL and hand back a parsed document
//! - [`HttpFetcher`]: `reqwest`-backed implementation with a browser User-Agent
//! - [`RetryFetch`]: decorator adding retries to any [`FetchPage`]
//!
//! A plain fetch never retries and uses the transport's default timeouts.
//! Error statuses are reported as [`ScrapeError::Status`] and transport
//! failures as [`ScrapeError::Request`]; neither is swallowed here.
//!
//! # Retry Strategy
//!
//! - `max_retries` extra attempts (0 turns the decorator into a pass-through)
//! - Exponential backoff from `base_delay`, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use crate::error::ScrapeError;
use rand::{Rng, rng};
use reqwest::Client;
use scraper::Html;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// User-Agent of a desktop Chrome; the target site rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Anything that can turn a URL into a parsed HTML document.
pub trait FetchPage {
    /// GET `url` and parse the body.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Request`] when no response arrives and
    /// [`ScrapeError::Status`] when the status is 4xx or 5xx.
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError>;
}

/// Fetcher backed by one pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher that sends `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError> {
        let t0 = Instant::now();
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| ScrapeError::Request {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ScrapeError::Request {
                url: url.to_string(),
                source,
            })?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(Html::parse_document(&body))
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchPage`].
///
/// The delay before retry `n` (1-based) is:
/// ```text
/// delay = min(base_delay * 2^(n-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    /// Wrap `inner`, allowing up to `max_retries` extra attempts per URL.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        let delay = self
            .base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage,
{
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(document) => return Ok(document),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                %url,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                                error = %e,
                                "fetch exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// URL on a local port that nothing listens on.
    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}/")
    }

    fn first_h1(document: &Html) -> Option<String> {
        let h1 = Selector::parse("h1").unwrap();
        document
            .select(&h1)
            .next()
            .map(|e| e.text().collect::<String>())
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/news"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Ola</h1>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).unwrap();
        let document = fetcher
            .fetch(&format!("{}/news", server.uri()))
            .await
            .unwrap();
        assert_eq!(first_h1(&document).as_deref(), Some("Ola"));

        let requests = server.received_requests().await.unwrap();
        let user_agent = requests[0]
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok());
        assert_eq!(user_agent, Some(DEFAULT_USER_AGENT));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        match err {
            ScrapeError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_is_request_error() {
        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).unwrap();
        let err = fetcher.fetch(&closed_port_url()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Request { .. }));
        assert!(err.is_http());
    }

    #[tokio::test]
    async fn test_retry_recovers_after_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Back</h1>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = RetryFetch::new(
            HttpFetcher::new(DEFAULT_USER_AGENT).unwrap(),
            2,
            Duration::from_millis(5),
        );
        let document = fetcher
            .fetch(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(first_h1(&document).as_deref(), Some("Back"));
    }

    #[tokio::test]
    async fn test_zero_retries_is_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = RetryFetch::new(
            HttpFetcher::new(DEFAULT_USER_AGENT).unwrap(),
            0,
            Duration::from_millis(5),
        );
        let err = fetcher
            .fetch(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));
    }

    #[test]
    fn test_backoff_is_capped() {
        let fetcher = RetryFetch::new(
            HttpFetcher::new(DEFAULT_USER_AGENT).unwrap(),
            10,
            Duration::from_secs(1),
        );
        let first = fetcher.backoff(1);
        assert!(first >= Duration::from_secs(1) && first <= Duration::from_millis(1250));
        let late = fetcher.backoff(10);
        assert!(late >= Duration::from_secs(30) && late <= Duration::from_millis(30_250));
    }
}
