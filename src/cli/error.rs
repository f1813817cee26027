//! CLI error types and conversions

use crate::fetcher::FetchError;
use crate::persister::PersistError;
use crate::resource::ResourceError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Resource lifecycle error
    #[error("resource error: {0}")]
    ResourceError(#[from] ResourceError),

    /// Fetcher error outside the lifecycle (e.g., client construction)
    #[error("fetcher error: {0}")]
    FetchError(#[from] FetchError),

    /// Persister error outside the lifecycle
    #[error("persister error: {0}")]
    PersistError(#[from] PersistError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
