//! Fetch collaborator implementations

use async_trait::async_trait;

use crate::Blob;

pub mod http;

pub use http::HttpFetcher;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network error
    #[error("network error: {0}")]
    NetworkError(String),

    /// Rate limit exceeded at the origin
    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Invalid response
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Retrieves the bytes of a resource from a URL.
///
/// Implementations must be safe to call repeatedly for the same URL; the
/// state machine treats every call as idempotent and may issue a fresh one
/// on each retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the resource at `url` as a single in-memory blob.
    async fn fetch(&self, url: &str) -> FetchResult<Blob>;
}
