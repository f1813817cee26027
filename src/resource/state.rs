//! Lifecycle state tags and the transition graph

use serde::{Deserialize, Serialize};

/// The lifecycle position of a resource.
///
/// A resource only ever moves forward through this graph and never returns
/// to `Idle`:
///
/// ```text
/// Idle --load--> Loading --ok--> Loaded --save--> Saving --ok--> Saved
///                   |  ^                            |  ^
///                 fail |                          fail |
///                   v  | load                       v  | save
///               LoadingFailed                   SavingFailed
/// ```
///
/// `Loading` and `Saving` double as the in-flight markers: the context only
/// enters them in the same critical section that starts the fetch or
/// persist, so observing the tag is enough to know an operation is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceState {
    /// Nothing has happened yet; `load()` is the only legal operation
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch failed; `load()` retries it
    LoadingFailed,
    /// The blob is cached in memory; `save()` is the only legal operation
    Loaded,
    /// A persist is in flight
    Saving,
    /// The last persist failed; `save()` retries it
    SavingFailed,
    /// The blob has been persisted; terminal
    Saved,
}

impl ResourceState {
    /// Whether a successful fetch has completed at least once, i.e., the
    /// context holds a cached blob in this state.
    pub fn has_blob(&self) -> bool {
        matches!(
            self,
            ResourceState::Loaded
                | ResourceState::Saving
                | ResourceState::SavingFailed
                | ResourceState::Saved
        )
    }

    /// Whether this state is terminal (no operation is legal anymore).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResourceState::Saved)
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceState::Idle => "idle",
            ResourceState::Loading => "loading",
            ResourceState::LoadingFailed => "loading-failed",
            ResourceState::Loaded => "loaded",
            ResourceState::Saving => "saving",
            ResourceState::SavingFailed => "saving-failed",
            ResourceState::Saved => "saved",
        };
        write!(f, "{s}")
    }
}
