//! File persister built on `tokio::fs`
//!
//! Implements atomic destination writes: the blob lands in a temporary
//! sibling file which is renamed over the destination, so an interrupted
//! write never leaves a half-written destination behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::persister::{PersistError, PersistResult, Persister};
use crate::Blob;

/// Suffix for the temporary sibling written before the rename.
const PART_SUFFIX: &str = ".part";

/// Production [`Persister`] writing blobs to the local filesystem.
///
/// Parent directories are created as needed.
#[derive(Debug, Default)]
pub struct FilePersister;

impl FilePersister {
    /// Create a new file persister.
    pub fn new() -> Self {
        Self
    }

    fn part_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(PART_SUFFIX);
        path.with_file_name(name)
    }
}

#[async_trait]
impl Persister for FilePersister {
    async fn persist(&self, path: &Path, blob: &Blob) -> PersistResult<()> {
        if path.file_name().is_none() {
            return Err(PersistError::InvalidDestination(format!(
                "path has no file name: {}",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    PersistError::IoError(format!(
                        "failed to create directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let part = Self::part_path(path);

        if let Err(e) = tokio::fs::write(&part, blob.bytes()).await {
            // Best-effort cleanup; the failure we report is the write error.
            if tokio::fs::remove_file(&part).await.is_err() {
                warn!(path = %part.display(), "failed to remove partial file");
            }
            return Err(PersistError::IoError(format!(
                "failed to write {}: {e}",
                part.display()
            )));
        }

        tokio::fs::rename(&part, path).await.map_err(|e| {
            PersistError::IoError(format!(
                "failed to rename {} to {}: {e}",
                part.display(),
                path.display()
            ))
        })?;

        debug!(
            path = %path.display(),
            bytes = blob.len(),
            "blob persisted"
        );

        Ok(())
    }
}
