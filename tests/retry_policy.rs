//! Retry bounds and backoff timing through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use zone_recon::{run_with_retry, AttemptOutcome, RetryConfig};

#[tokio::test(start_paused = true)]
async fn test_timeouts_retried_three_times_with_doubling_backoff() {
    let calls = Mutex::new(Vec::new());
    let start = Instant::now();
    let config = RetryConfig {
        max_attempts: 3,
        base_backoff: Duration::from_millis(100),
    };

    let outcome = run_with_retry(
        || {
            calls.lock().unwrap().push(start.elapsed());
            async { AttemptOutcome::Timeout }
        },
        &config,
    )
    .await;

    assert_eq!(outcome, AttemptOutcome::Timeout);
    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), 3);
    let first_gap = calls[1] - calls[0];
    let second_gap = calls[2] - calls[1];
    assert!(first_gap >= Duration::from_millis(100) && first_gap < Duration::from_millis(105));
    assert!(second_gap >= Duration::from_millis(200) && second_gap < Duration::from_millis(205));
}

#[tokio::test(start_paused = true)]
async fn test_terminal_outcomes_are_not_retried() {
    for terminal in [AttemptOutcome::Refused, AttemptOutcome::NoAnswer] {
        let calls = AtomicUsize::new(0);
        let outcome = run_with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                let result = terminal.clone();
                async move { result }
            },
            &RetryConfig::default(),
        )
        .await;
        assert_eq!(outcome, terminal);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_then_success() {
    let calls = AtomicUsize::new(0);
    let outcome = run_with_retry(
        || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    AttemptOutcome::TransportError("connection reset".into())
                } else {
                    AttemptOutcome::Success(Vec::new())
                }
            }
        },
        &RetryConfig::default(),
    )
    .await;
    assert_eq!(outcome, AttemptOutcome::Success(Vec::new()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
