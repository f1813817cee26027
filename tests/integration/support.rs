//! Shared mock collaborators for lifecycle tests
//!
//! The mocks count invocations, replay scripted results in order, and can be
//! gated on a [`Notify`] so a test can hold a fetch or persist in flight
//! while it drives the context from another task.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use blob_mirror::fetcher::{FetchError, FetchResult, Fetcher};
use blob_mirror::persister::{PersistError, PersistResult, Persister};
use blob_mirror::resource::{ResourceConfig, ResourceContext, ResourceState};
use blob_mirror::Blob;

/// The blob most tests move through the lifecycle: `{}` as JSON.
pub fn json_blob() -> Blob {
    Blob::new(vec![0x7B, 0x7D], "application/json")
}

/// A config pointing at paths no test actually dereferences.
pub fn test_config() -> ResourceConfig {
    ResourceConfig::new("https://example.com/posts/1", "/tmp/mirror/post-1.json")
}

/// Fetcher replaying scripted results, with an invocation counter and an
/// optional gate awaited between the count and the result.
pub struct MockFetcher {
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    results: Mutex<VecDeque<FetchResult<Blob>>>,
}

impl MockFetcher {
    pub fn scripted(results: Vec<FetchResult<Blob>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: None,
            results: Mutex::new(results.into_iter().collect()),
        }
    }

    pub fn succeeding(blob: Blob) -> Self {
        Self::scripted(vec![Ok(blob)])
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> FetchResult<Blob> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::NetworkError("mock fetcher exhausted".to_string())))
    }
}

/// Persister replaying scripted results and recording every successful write.
pub struct MockPersister {
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
    results: Mutex<VecDeque<PersistResult<()>>>,
    writes: Mutex<Vec<(PathBuf, Blob)>>,
}

impl MockPersister {
    pub fn scripted(results: Vec<PersistResult<()>>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: None,
            results: Mutex::new(results.into_iter().collect()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::scripted(vec![Ok(())])
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(PathBuf, Blob)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Persister for MockPersister {
    async fn persist(&self, path: &Path, blob: &Blob) -> PersistResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PersistError::IoError("mock persister exhausted".to_string())));
        if result.is_ok() {
            self.writes
                .lock()
                .unwrap()
                .push((path.to_path_buf(), blob.clone()));
        }
        result
    }
}

/// Build a context over the given mocks with the standard test config.
pub fn context_with(fetcher: Arc<MockFetcher>, persister: Arc<MockPersister>) -> ResourceContext {
    ResourceContext::new(test_config(), fetcher, persister)
}

/// Spin until the context reaches `state`, panicking after one second.
pub async fn wait_for_state(ctx: &ResourceContext, state: ResourceState) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while ctx.current_state() != state {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("context never reached state {state}"));
}
