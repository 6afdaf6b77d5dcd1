//! Cancellation behavior of the orchestrator.
//!
//! A cancelled run must return normally with exactly the discoveries of the
//! tasks that settled before the signal, and must not wait for hanging
//! collaborators.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use zone_recon::{run_all, DnsError, OutcomeKind, ProgressCallback, TaskKind};

use helpers::{collaborators, fast_options, target, Behavior, FakeResolver, FakeTransfer};

#[tokio::test]
async fn test_cancel_after_two_of_five_tasks() {
    let transfer = FakeTransfer::new().zone("ns1", &["www"]);
    let resolver = FakeResolver::new()
        .address("a.example.com", "192.0.2.10")
        .on("b.example.com", Behavior::Hang)
        .on("c.example.com", Behavior::Hang)
        .on("d.example.com", Behavior::Hang);
    let collaborators = collaborators(transfer, resolver);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let progress: ProgressCallback = Some(Arc::new(move |done, _total| {
        if done == 2 {
            trigger.cancel();
        }
    }));

    let summary = tokio::time::timeout(
        Duration::from_secs(5),
        run_all(
            &target("example.com", &["ns1"], &["a", "b", "c", "d"]),
            &fast_options(5),
            &collaborators,
            cancel,
            progress,
        ),
    )
    .await
    .expect("cancelled run should not wait for hanging tasks");

    assert!(summary.cancelled);
    assert_eq!(summary.total_tasks, 5);
    assert_eq!(summary.completed_tasks, 2);
    assert_eq!(
        summary.snapshot.fqdns(),
        vec!["a.example.com", "www.example.com"]
    );
    assert_eq!(summary.stats.count(TaskKind::Probe, OutcomeKind::Cancelled), 3);
    // Cancelled tasks are not failures
    assert!(summary.failures.is_empty());
}

#[tokio::test]
async fn test_cancel_stops_dispatch_of_queued_tasks() {
    let transfer = FakeTransfer::new().on("ns1", Behavior::Hang);
    let resolver = FakeResolver::new();
    let resolver_calls = Arc::new(resolver);
    let collaborators = zone_recon::Collaborators::new(Arc::new(transfer), resolver_calls.clone());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    // One worker, held by the hanging transfer: no probe ever starts
    let summary = run_all(
        &target("example.com", &["ns1"], &["www", "api", "dev"]),
        &fast_options(1),
        &collaborators,
        cancel,
        None,
    )
    .await;

    assert!(summary.cancelled);
    assert!(summary.snapshot.is_empty());
    assert_eq!(summary.completed_tasks, 0);
    assert_eq!(
        resolver_calls.calls.load(std::sync::atomic::Ordering::SeqCst),
        0
    );
    assert_eq!(
        summary.stats.count(TaskKind::ZoneTransfer, OutcomeKind::Cancelled),
        1
    );
    assert_eq!(summary.stats.count(TaskKind::Probe, OutcomeKind::Cancelled), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_retry_backoff() {
    let transfer =
        FakeTransfer::new().on("ns1", Behavior::Answer(Err(DnsError::Transport("reset".into()))));
    let collaborators = collaborators(transfer, FakeResolver::new());
    let mut options = fast_options(1);
    options.retry.base_backoff = Duration::from_secs(3600);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    let summary = run_all(
        &target("example.com", &["ns1"], &[]),
        &options,
        &collaborators,
        cancel,
        None,
    )
    .await;

    assert!(summary.cancelled);
    assert!(started.elapsed() < Duration::from_secs(3600));
    assert_eq!(
        summary.stats.count(TaskKind::ZoneTransfer, OutcomeKind::Cancelled),
        1
    );
}
