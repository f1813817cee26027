//! # Blob Mirror Library
//!
//! A small library for mirroring remote resources to local disk. A resource
//! is fetched over HTTP, cached in memory as an immutable [`Blob`], and then
//! persisted to a destination path. The whole lifecycle is driven by an
//! explicit state machine so that callers can never trigger a duplicate
//! fetch or a duplicate write by invoking operations at the wrong time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use blob_mirror::resource::{ResourceConfig, ResourceContext};
//! use blob_mirror::fetcher::HttpFetcher;
//! use blob_mirror::persister::FilePersister;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResourceConfig::new(
//!     "https://example.com/posts/1",
//!     "./files/post-1.json",
//! );
//!
//! let context = ResourceContext::new(
//!     config,
//!     Arc::new(HttpFetcher::new()?),
//!     Arc::new(FilePersister::new()),
//! );
//!
//! context.load().await?;
//! context.save().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several core modules:
//!
//! - [`resource`] - Lifecycle state machine, context, and configuration
//! - [`fetcher`] - The fetch collaborator trait and its HTTP implementation
//! - [`persister`] - The persist collaborator trait and its file implementation
//! - [`cli`] - CLI command implementations
//!
//! ## Lifecycle
//!
//! A resource starts `Idle`, reaches `Loaded` through `Loading` (or parks in
//! `LoadingFailed` until retried), and from there reaches `Saved` through
//! `Saving` (or `SavingFailed`). `Saved` is terminal. Concurrent `load()` or
//! `save()` calls coalesce: at most one fetch and one persist is ever in
//! flight per resource.

#![warn(missing_docs)]
#![warn(clippy::all)]

use bytes::Bytes;

/// CLI command implementations
pub mod cli;

/// Fetch collaborator
pub mod fetcher;

/// Persist collaborator
pub mod persister;

/// Resource lifecycle state machine
pub mod resource;

// Re-export commonly used types
pub use resource::{ResourceConfig, ResourceContext, ResourceError, ResourceState};

/// An immutable byte buffer tagged with a content type.
///
/// A `Blob` is produced by a [`fetcher::Fetcher`] and consumed by a
/// [`persister::Persister`]; the state machine only carries it between the
/// two. Cloning is cheap: the payload is a reference-counted [`Bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    content_type: String,
}

impl Blob {
    /// Create a blob from raw bytes and a content-type tag.
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }

    /// The raw payload.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The content-type tag (e.g., "application/json").
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
