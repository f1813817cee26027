//! Persist collaborator implementations

use std::path::Path;

use async_trait::async_trait;

use crate::Blob;

pub mod file;

pub use file::FilePersister;

/// Persister errors
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Destination path is not usable (e.g., parent is not a directory)
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
}

/// Result type for persist operations
pub type PersistResult<T> = Result<T, PersistError>;

/// Writes a blob to a named location.
///
/// A partial write must surface as a single failure outcome; implementations
/// never report partial success.
#[async_trait]
pub trait Persister: Send + Sync {
    /// Persist `blob` at `path`, replacing any previous content.
    async fn persist(&self, path: &Path, blob: &Blob) -> PersistResult<()>;
}
