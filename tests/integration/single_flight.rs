//! Single-flight guarantee tests
//!
//! Two logically concurrent calls must coalesce into one collaborator
//! invocation: the loser observes the in-flight state and returns without
//! starting a second fetch or persist.

use std::sync::Arc;

use tokio::sync::Notify;

use blob_mirror::resource::{LoadOutcome, ResourceState, SaveOutcome};

use super::support::{context_with, json_blob, MockFetcher, MockPersister, wait_for_state};

#[tokio::test]
async fn test_concurrent_loads_issue_one_fetch() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(MockFetcher::succeeding(json_blob()).with_gate(gate.clone()));
    let persister = Arc::new(MockPersister::succeeding());
    let ctx = Arc::new(context_with(fetcher.clone(), persister));

    let first = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { ctx.load().await })
    };
    wait_for_state(&ctx, ResourceState::Loading).await;

    // The second call must coalesce without starting a fetch of its own.
    let second = ctx.load().await.unwrap();
    assert_eq!(second, LoadOutcome::AlreadyInFlight);
    assert_eq!(fetcher.calls(), 1);

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, LoadOutcome::Fetched);

    assert_eq!(ctx.current_state(), ResourceState::Loaded);
    assert_eq!(ctx.blob(), Some(json_blob()));
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_many_concurrent_loads_still_issue_one_fetch() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(MockFetcher::succeeding(json_blob()).with_gate(gate.clone()));
    let persister = Arc::new(MockPersister::succeeding());
    let ctx = Arc::new(context_with(fetcher.clone(), persister));

    let winner = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { ctx.load().await })
    };
    wait_for_state(&ctx, ResourceState::Loading).await;

    for _ in 0..8 {
        assert_eq!(ctx.load().await.unwrap(), LoadOutcome::AlreadyInFlight);
    }

    gate.notify_one();
    assert_eq!(winner.await.unwrap().unwrap(), LoadOutcome::Fetched);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(ctx.current_state(), ResourceState::Loaded);
}

#[tokio::test]
async fn test_concurrent_saves_issue_one_persist() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(MockFetcher::succeeding(json_blob()));
    let persister = Arc::new(MockPersister::succeeding().with_gate(gate.clone()));
    let ctx = Arc::new(context_with(fetcher, persister.clone()));

    ctx.load().await.unwrap();

    let first = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { ctx.save().await })
    };
    wait_for_state(&ctx, ResourceState::Saving).await;

    let second = ctx.save().await.unwrap();
    assert_eq!(second, SaveOutcome::AlreadyInFlight);
    assert_eq!(persister.calls(), 1);

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), SaveOutcome::Persisted);

    assert_eq!(ctx.current_state(), ResourceState::Saved);
    assert_eq!(persister.calls(), 1);
    assert_eq!(persister.writes().len(), 1);
}

#[tokio::test]
async fn test_coalesced_load_during_failed_fetch_observes_failure() {
    let gate = Arc::new(Notify::new());
    let fetcher = Arc::new(
        MockFetcher::scripted(vec![Err(blob_mirror::fetcher::FetchError::NetworkError(
            "connection reset".to_string(),
        ))])
        .with_gate(gate.clone()),
    );
    let persister = Arc::new(MockPersister::succeeding());
    let ctx = Arc::new(context_with(fetcher.clone(), persister));

    let first = {
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { ctx.load().await })
    };
    wait_for_state(&ctx, ResourceState::Loading).await;

    assert_eq!(ctx.load().await.unwrap(), LoadOutcome::AlreadyInFlight);

    gate.notify_one();
    assert!(first.await.unwrap().is_err());

    // The coalesced caller can observe the failure through the state tag and
    // retry from there.
    assert_eq!(ctx.current_state(), ResourceState::LoadingFailed);
    assert_eq!(fetcher.calls(), 1);
}
