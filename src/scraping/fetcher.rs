//! Fetch engine for help-center pages
//!
//! Plain HTTP GET with a browser-like header set, a per-request timeout and
//! exponential backoff between attempts. Failures are reported through
//! [`PageFetchResult`] rather than returned as errors, so callers can mark a
//! page as attempted and move on.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    UPGRADE_INSECURE_REQUESTS,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Chrome on Windows, as sent by a regular visitor
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// Errors from a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Outcome of fetching one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    Failure,
}

/// Result of fetching one page, including every retry
#[derive(Debug, Clone)]
pub struct PageFetchResult {
    /// Requested URL
    pub url: String,
    pub status: FetchStatus,
    /// Response body on success
    pub body: Option<String>,
    /// Number of attempts made
    pub attempts: u32,
    /// Last error message on failure
    pub error: Option<String>,
}

impl PageFetchResult {
    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// Configuration for the fetch engine
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Attempts per page, including the first
    pub max_retries: u32,
    /// Backoff unit; the wait after attempt `n` is `backoff_base * 2^n`
    pub backoff_base: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Fetch statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// HTTP requests sent
    pub requests: u64,
    /// Pages fetched successfully
    pub pages_fetched: u64,
    /// Pages given up on
    pub pages_failed: u64,
}

/// HTTP fetcher shared by all crawl workers (stats use atomics, no locking)
pub struct FetchEngine {
    http_client: reqwest::Client,
    config: FetchConfig,
    requests: AtomicU64,
    pages_fetched: AtomicU64,
    pages_failed: AtomicU64,
}

impl FetchEngine {
    /// Create a new fetch engine
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("document"));
        headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("navigate"));
        headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-origin"));
        headers.insert(HeaderName::from_static("sec-fetch-user"), HeaderValue::from_static("?1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self {
            http_client,
            config,
            requests: AtomicU64::new(0),
            pages_fetched: AtomicU64::new(0),
            pages_failed: AtomicU64::new(0),
        })
    }

    /// Fetch a page, retrying transport errors and non-2xx responses
    pub async fn fetch(&self, url: &str) -> PageFetchResult {
        let max_attempts = self.config.max_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            tracing::debug!(url, attempt, "Fetching");

            match self.fetch_once(url).await {
                Ok(body) => {
                    self.pages_fetched.fetch_add(1, Ordering::Relaxed);
                    return PageFetchResult {
                        url: url.to_string(),
                        status: FetchStatus::Success,
                        body: Some(body),
                        attempts: attempt,
                        error: None,
                    };
                }
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        let wait = self.backoff(attempt);
                        tracing::warn!(
                            "Error fetching {}: {}. Retrying in {:?} (attempt {}/{})",
                            url,
                            e,
                            wait,
                            attempt,
                            max_attempts
                        );
                        tokio::time::sleep(wait).await;
                    } else {
                        tracing::warn!("Error fetching {}: {} (attempt {}/{})", url, e, attempt, max_attempts);
                    }
                }
            }
        }

        tracing::error!("Failed to fetch {} after {} attempts", url, max_attempts);
        self.pages_failed.fetch_add(1, Ordering::Relaxed);

        PageFetchResult {
            url: url.to_string(),
            status: FetchStatus::Failure,
            body: None,
            attempts: max_attempts,
            error: Some(last_error),
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(FetchError::Transport)
    }

    /// Wait before the next attempt after `attempt` failures
    fn backoff(&self, attempt: u32) -> Duration {
        self.config
            .backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Get fetch statistics
    pub fn stats(&self) -> FetchStats {
        FetchStats {
            requests: self.requests.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config() -> FetchConfig {
        FetchConfig {
            backoff_base: Duration::ZERO,
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_backoff_is_exponential() {
        let engine = FetchEngine::new(FetchConfig::default()).unwrap();
        assert_eq!(engine.backoff(1), Duration::from_secs(2));
        assert_eq!(engine.backoff(2), Duration::from_secs(4));
        assert_eq!(engine.backoff(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_fetch_success_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let engine = FetchEngine::new(fast_config()).unwrap();
        let result = engine.fetch(&format!("{}/page", server.uri())).await;

        assert!(result.is_success());
        assert_eq!(result.attempts, 1);
        assert_eq!(result.body.as_deref(), Some("<html>ok</html>"));

        let requests = server.received_requests().await.unwrap();
        let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert!(user_agent.contains("Chrome/91"));
        let headers = &requests[0].headers;
        assert!(headers.get("accept-language").is_some());
        assert_eq!(headers.get("upgrade-insecure-requests").unwrap(), "1");
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
        assert_eq!(headers.get("sec-fetch-dest").unwrap(), "document");
        assert_eq!(headers.get("cache-control").unwrap(), "max-age=0");
    }

    #[tokio::test]
    async fn test_fetch_retries_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let engine = FetchEngine::new(fast_config()).unwrap();
        let result = engine.fetch(&format!("{}/down", server.uri())).await;

        assert_eq!(result.status, FetchStatus::Failure);
        assert_eq!(result.attempts, 3);
        assert!(result.body.is_none());
        let error = result.error.unwrap();
        assert!(error.starts_with("HTTP 503"), "unexpected error: {error}");
        assert_eq!(engine.stats().requests, 3);
        assert_eq!(engine.stats().pages_failed, 1);
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_transient_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
            .mount(&server)
            .await;

        let engine = FetchEngine::new(fast_config()).unwrap();
        let result = engine.fetch(&format!("{}/flaky", server.uri())).await;

        assert!(result.is_success());
        assert_eq!(result.attempts, 2);
        assert_eq!(result.body.as_deref(), Some("recovered"));
    }

    #[tokio::test]
    async fn test_connection_error_is_failure() {
        let engine = FetchEngine::new(FetchConfig {
            max_retries: 2,
            ..fast_config()
        })
        .unwrap();
        let result = engine.fetch("http://127.0.0.1:1/unreachable").await;

        assert!(!result.is_success());
        assert_eq!(result.attempts, 2);
        assert!(result.error.unwrap().starts_with("Transport error"));
    }
}
