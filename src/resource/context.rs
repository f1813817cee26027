//! Resource context: the single mutable aggregate driving the lifecycle

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::fetcher::Fetcher;
use crate::persister::Persister;
use crate::resource::{ResourceConfig, ResourceError, ResourceState};
use crate::Blob;

/// What a `load()` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This call performed the fetch and the resource is now `Loaded`.
    Fetched,
    /// Another call already had a fetch in flight; nothing was started.
    AlreadyInFlight,
}

/// What a `save()` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// This call performed the persist and the resource is now `Saved`.
    Persisted,
    /// Another call already had a persist in flight; nothing was started.
    AlreadyInFlight,
}

/// Mutable lifecycle data, guarded as one unit so a legality check, the
/// matching transition, and the blob update are always a single atomic step.
struct Inner {
    state: ResourceState,
    blob: Option<Blob>,
}

/// Drives one resource through its lifecycle.
///
/// The context owns the current [`ResourceState`], the configuration, and
/// the cached [`Blob`] once a fetch has succeeded. The fetcher and persister
/// are supplied at construction and never replaced.
///
/// All methods take `&self`; a context is intended to be shared behind an
/// [`Arc`] across tasks. The legality check and the transition into
/// `Loading`/`Saving` happen in one critical section, so two concurrent
/// `load()` (or `save()`) calls coalesce into a single collaborator
/// invocation: the loser observes the in-flight tag and returns
/// [`LoadOutcome::AlreadyInFlight`] (resp. [`SaveOutcome::AlreadyInFlight`])
/// without doing any work. The lock is never held across the fetch or
/// persist await.
pub struct ResourceContext {
    config: ResourceConfig,
    fetcher: Arc<dyn Fetcher>,
    persister: Arc<dyn Persister>,
    inner: Mutex<Inner>,
}

impl ResourceContext {
    /// Create a new context in the `Idle` state with no cached blob.
    pub fn new(
        config: ResourceConfig,
        fetcher: Arc<dyn Fetcher>,
        persister: Arc<dyn Persister>,
    ) -> Self {
        Self {
            config,
            fetcher,
            persister,
            inner: Mutex::new(Inner {
                state: ResourceState::Idle,
                blob: None,
            }),
        }
    }

    /// Fetch the resource from its source URL and cache it in memory.
    ///
    /// Legal from `Idle` and `LoadingFailed` (retry). If a fetch is already
    /// in flight, returns [`LoadOutcome::AlreadyInFlight`] without starting
    /// a second one. From any later state the resource is already loaded and
    /// the call fails with [`ResourceError::InvalidState`] without touching
    /// the state.
    ///
    /// # Errors
    /// Returns [`ResourceError::Transport`] if the fetcher fails; the
    /// resource then parks in `LoadingFailed` until `load()` is called
    /// again.
    pub async fn load(&self) -> Result<LoadOutcome, ResourceError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                ResourceState::Idle | ResourceState::LoadingFailed => {
                    inner.state = ResourceState::Loading;
                }
                ResourceState::Loading => {
                    debug!(url = %self.config.source_url, "load coalesced: fetch already in flight");
                    return Ok(LoadOutcome::AlreadyInFlight);
                }
                ResourceState::Loaded
                | ResourceState::Saving
                | ResourceState::SavingFailed
                | ResourceState::Saved => {
                    return Err(ResourceError::InvalidState(
                        "resource already loaded".to_string(),
                    ));
                }
            }
        }

        debug!(url = %self.config.source_url, "fetching resource");

        match self.fetcher.fetch(&self.config.source_url).await {
            Ok(blob) => {
                let mut inner = self.inner.lock();
                debug!(
                    bytes = blob.len(),
                    content_type = %blob.content_type(),
                    "fetch succeeded"
                );
                inner.blob = Some(blob);
                inner.state = ResourceState::Loaded;
                Ok(LoadOutcome::Fetched)
            }
            Err(e) => {
                let mut inner = self.inner.lock();
                warn!(url = %self.config.source_url, error = %e, "fetch failed");
                inner.state = ResourceState::LoadingFailed;
                Err(ResourceError::Transport(e))
            }
        }
    }

    /// Persist the cached blob to the destination path.
    ///
    /// Legal from `Loaded` and `SavingFailed` (retry). If a persist is
    /// already in flight, returns [`SaveOutcome::AlreadyInFlight`] without
    /// starting a second one. In every other state the call fails with
    /// [`ResourceError::InvalidState`] without touching the state.
    ///
    /// # Errors
    /// Returns [`ResourceError::Persistence`] if the persister fails; the
    /// resource then parks in `SavingFailed` until `save()` is called again.
    ///
    /// # Panics
    /// Panics if the cached blob is absent while entering `Saving`. That is
    /// unreachable through the public API: the blob is cached in the same
    /// critical section that enters `Loaded`, and `Saving` is only reachable
    /// from `Loaded`.
    pub async fn save(&self) -> Result<SaveOutcome, ResourceError> {
        let blob = {
            let mut inner = self.inner.lock();
            match inner.state {
                ResourceState::Idle => {
                    return Err(ResourceError::InvalidState(
                        "resource not loaded yet".to_string(),
                    ));
                }
                ResourceState::Loading | ResourceState::LoadingFailed => {
                    return Err(ResourceError::InvalidState(
                        "resource still loading".to_string(),
                    ));
                }
                ResourceState::Loaded | ResourceState::SavingFailed => {
                    inner.state = ResourceState::Saving;
                    inner
                        .blob
                        .clone()
                        .expect("blob must be cached before entering Saving")
                }
                ResourceState::Saving => {
                    debug!(
                        path = %self.config.destination_path.display(),
                        "save coalesced: persist already in flight"
                    );
                    return Ok(SaveOutcome::AlreadyInFlight);
                }
                ResourceState::Saved => {
                    return Err(ResourceError::InvalidState(
                        "resource already saved".to_string(),
                    ));
                }
            }
        };

        debug!(
            path = %self.config.destination_path.display(),
            bytes = blob.len(),
            "persisting resource"
        );

        match self
            .persister
            .persist(&self.config.destination_path, &blob)
            .await
        {
            Ok(()) => {
                let mut inner = self.inner.lock();
                debug!(path = %self.config.destination_path.display(), "persist succeeded");
                inner.state = ResourceState::Saved;
                Ok(SaveOutcome::Persisted)
            }
            Err(e) => {
                let mut inner = self.inner.lock();
                warn!(
                    path = %self.config.destination_path.display(),
                    error = %e,
                    "persist failed"
                );
                inner.state = ResourceState::SavingFailed;
                Err(ResourceError::Persistence(e))
            }
        }
    }

    /// The current lifecycle state. Read-only; no side effect.
    pub fn current_state(&self) -> ResourceState {
        self.inner.lock().state
    }

    /// The cached blob, if a fetch has succeeded at least once.
    pub fn blob(&self) -> Option<Blob> {
        self.inner.lock().blob.clone()
    }

    /// The configuration this context was created with.
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }
}
