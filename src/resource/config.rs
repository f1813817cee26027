//! Resource configuration and retry constants

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum number of retries for failed HTTP requests.
/// 5 retries with exponential backoff allows recovery from transient network
/// issues while avoiding infinite loops on persistent failures.
pub const MAX_RETRIES: u32 = 5;

/// Initial backoff delay in milliseconds.
/// 1 second is long enough for rate limit windows to reset but short enough
/// to not overly delay recovery from transient errors.
pub const INITIAL_BACKOFF_MS: u64 = 1000; // 1 second

/// Maximum backoff delay in milliseconds.
/// 30 seconds caps exponential backoff to prevent excessive wait times.
pub const MAX_BACKOFF_MS: u64 = 30000; // 30 seconds

/// Default request timeout in seconds. A stuck fetch surfaces as an ordinary
/// transport failure instead of hanging the lifecycle forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Calculate exponential backoff delay
pub fn calculate_backoff(retry_count: u32) -> Duration {
    let delay_ms = INITIAL_BACKOFF_MS * 2u64.pow(retry_count);
    let delay_ms = delay_ms.min(MAX_BACKOFF_MS);
    Duration::from_millis(delay_ms)
}

/// Describes one resource to mirror: where its bytes come from and where
/// they go. Immutable for the lifetime of a
/// [`ResourceContext`](super::ResourceContext).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceConfig {
    /// URL the resource is fetched from
    pub source_url: String,
    /// Local path the resource is persisted to
    pub destination_path: PathBuf,
}

impl ResourceConfig {
    /// Create a new resource configuration.
    pub fn new(source_url: impl Into<String>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_path: destination_path.into(),
        }
    }

    /// The source URL.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The destination path.
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.source_url.is_empty() {
            return Err("Source URL cannot be empty".to_string());
        }

        if self.destination_path.as_os_str().is_empty() {
            return Err("Destination path cannot be empty".to_string());
        }

        Ok(())
    }
}
