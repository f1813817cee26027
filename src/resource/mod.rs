//! Resource lifecycle state machine
//!
//! This module owns the core of the library: a [`ResourceContext`] that moves
//! a remote resource through an explicit lifecycle while guaranteeing that at
//! most one fetch and one persist is ever in flight.
//!
//! # Overview
//!
//! 1. **Configuration**: Describe the resource with [`config::ResourceConfig`]
//! 2. **Context**: Create a [`context::ResourceContext`] with a fetcher and a persister
//! 3. **Load**: `load()` fetches the remote bytes and caches them as a [`crate::Blob`]
//! 4. **Save**: `save()` hands the cached blob to the persister
//! 5. **Introspection**: `current_state()` exposes the [`state::ResourceState`] tag
//!
//! # Error Handling
//!
//! All operations return `Result<T, ResourceError>`. Errors are categorized
//! by type:
//! - Invalid-state errors (the operation is not legal right now; no
//!   transition happens and no collaborator is invoked)
//! - Transport errors (the fetch failed; the resource parks in
//!   `LoadingFailed` until `load()` is retried)
//! - Persistence errors (the write failed; the resource parks in
//!   `SavingFailed` until `save()` is retried)
//!
//! The state machine never retries on its own: a caller that gives up after
//! a failure leaves the resource parked in the matching failed state.

pub mod config;
pub mod context;
pub mod state;

pub use config::ResourceConfig;
pub use context::{LoadOutcome, ResourceContext, SaveOutcome};
pub use state::ResourceState;

use crate::fetcher::FetchError;
use crate::persister::PersistError;

/// Resource lifecycle errors
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Operation is not legal in the current state. The message tells the
    /// caller what to do instead. No transition occurs.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Fetch collaborator failed; the resource moved to `LoadingFailed`.
    #[error("transport error: {0}")]
    Transport(#[from] FetchError),

    /// Persist collaborator failed; the resource moved to `SavingFailed`.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistError),
}
