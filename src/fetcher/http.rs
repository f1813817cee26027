//! HTTP fetcher built on `reqwest`
//!
//! Provides the production [`Fetcher`] implementation with:
//! - Retry logic with exponential backoff
//! - Request timeout so a stuck origin surfaces as an ordinary failure
//! - Content-type taken from the response headers

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::fetcher::{FetchError, FetchResult, Fetcher};
use crate::resource::config::{calculate_backoff, DEFAULT_TIMEOUT_SECS, MAX_RETRIES};
use crate::Blob;

/// Content type reported when the origin does not send one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP fetcher with retry and timeout.
///
/// Retries on:
/// - Network errors (timeout, connection refused)
/// - 5xx server errors
/// - 429 rate limit errors
///
/// Does not retry on:
/// - Other 4xx client errors
/// - Successful responses
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout and retry budget.
    pub fn new() -> FetchResult<Self> {
        Self::with_settings(Duration::from_secs(DEFAULT_TIMEOUT_SECS), MAX_RETRIES)
    }

    /// Create a fetcher with an explicit timeout and retry budget.
    pub fn with_settings(timeout: Duration, max_retries: u32) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries,
        })
    }

    /// Create a fetcher around an existing HTTP client.
    pub fn from_client(client: Client, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    /// The configured retry budget.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    async fn request_with_retry(&self, url: &str) -> FetchResult<Blob> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            let response = match self.client.get(url).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(
                        "Network error on attempt {}/{}: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        e
                    );
                    last_error = Some(FetchError::NetworkError(e.to_string()));

                    if attempt < self.max_retries {
                        let backoff = calculate_backoff(attempt);
                        debug!("Retrying after {:?}", backoff);
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    break;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 {
                warn!(
                    "Rate limit error (429) on attempt {}/{}",
                    attempt + 1,
                    self.max_retries + 1
                );
                last_error = Some(FetchError::RateLimitExceeded);

                if attempt < self.max_retries {
                    let backoff = calculate_backoff(attempt);
                    debug!("Retrying after {:?}", backoff);
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                break;
            }

            if status.is_server_error() {
                warn!(
                    "Server error {} on attempt {}/{}",
                    status,
                    attempt + 1,
                    self.max_retries + 1
                );
                last_error = Some(FetchError::HttpError(format!("server error: {status}")));

                if attempt < self.max_retries {
                    let backoff = calculate_backoff(attempt);
                    debug!("Retrying after {:?}", backoff);
                    tokio::time::sleep(backoff).await;
                    continue;
                }
                break;
            }

            if status.is_client_error() {
                // 4xx other than 429 will not improve on retry
                return Err(FetchError::HttpError(format!("client error: {status}")));
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| FetchError::InvalidResponse(format!("failed to read body: {e}")))?;

            debug!(
                bytes = bytes.len(),
                content_type = %content_type,
                "HTTP fetch completed"
            );

            return Ok(Blob::new(bytes, content_type));
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::NetworkError("request failed with no attempts".to_string())))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<Blob> {
        debug!(url = %url, "Making GET request");
        self.request_with_retry(url).await
    }
}
