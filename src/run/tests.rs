//! Orchestrator tests with in-memory collaborators.

use super::*;
use crate::dns::{RecordType, ZoneRecord};
use crate::error_handling::DnsError;
use crate::models::Source;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Transfer collaborator with a fixed answer per nameserver that counts calls.
#[derive(Default)]
struct ScriptedTransfer {
    answers: HashMap<String, Result<Vec<ZoneRecord>, DnsError>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedTransfer {
    fn answer(mut self, ns: &str, answer: Result<Vec<ZoneRecord>, DnsError>) -> Self {
        self.answers.insert(ns.to_string(), answer);
        self
    }

    fn calls(&self, ns: &str) -> usize {
        self.calls.lock().unwrap().get(ns).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ZoneTransfer for ScriptedTransfer {
    async fn transfer(&self, nameserver: &str, _domain: &str) -> Result<Vec<ZoneRecord>, DnsError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(nameserver.to_string())
            .or_default() += 1;
        if nameserver == "panic" {
            panic!("collaborator bug");
        }
        self.answers
            .get(nameserver)
            .cloned()
            .unwrap_or(Err(DnsError::Refused))
    }
}

/// Resolver that answers every name after a short delay and records the
/// highest number of concurrent lookups.
#[derive(Default)]
struct SlowResolver {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    fail_transient: bool,
}

#[async_trait]
impl Resolve for SlowResolver {
    async fn resolve(&self, _fqdn: &str, _record_type: RecordType) -> Result<Vec<String>, DnsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.fail_transient {
            Err(DnsError::Transport("unreachable".into()))
        } else {
            Ok(vec!["192.0.2.10".to_string()])
        }
    }
}

fn target(nameservers: &[&str], labels: &[&str]) -> Target {
    Target::new(
        "example.com",
        nameservers.iter().map(|s| s.to_string()),
        labels.iter().map(|s| s.to_string()),
    )
    .unwrap()
}

fn options(concurrency: usize) -> RunOptions {
    RunOptions {
        concurrency,
        timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_attempts: 3,
            base_backoff: Duration::from_millis(100),
        },
        retry_probes: false,
    }
}

fn zone(names: &[&str]) -> Vec<ZoneRecord> {
    names
        .iter()
        .map(|n| ZoneRecord::new(*n, format!("{n}.example.com. 300 IN A 192.0.2.1")))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_worker_pool_bounds_in_flight_tasks() {
    let labels: Vec<String> = (0..40).map(|i| format!("host{i}")).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let resolver = Arc::new(SlowResolver::default());
    let collaborators = Collaborators::new(
        Arc::new(ScriptedTransfer::default().answer("ns1", Ok(Vec::new()))),
        resolver.clone(),
    );

    let summary = run_all(
        &target(&["ns1"], &labels),
        &options(4),
        &collaborators,
        CancellationToken::new(),
        None,
    )
    .await;

    assert_eq!(summary.snapshot.len(), 40);
    assert!(resolver.max_in_flight.load(Ordering::SeqCst) <= 4);
    assert_eq!(summary.completed_tasks, 41);
    assert_eq!(summary.total_tasks, 41);
    assert!(!summary.cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_transient_transfer_failure_is_retried_to_the_bound() {
    let transfer = Arc::new(
        ScriptedTransfer::default()
            .answer("flaky", Err(DnsError::Transport("reset".into())))
            .answer("strict", Err(DnsError::Refused)),
    );
    let collaborators = Collaborators::new(transfer.clone(), Arc::new(SlowResolver::default()));

    let summary = run_all(
        &target(&["flaky", "strict"], &[]),
        &options(2),
        &collaborators,
        CancellationToken::new(),
        None,
    )
    .await;

    assert_eq!(transfer.calls("flaky"), 3);
    assert_eq!(transfer.calls("strict"), 1);
    assert!(summary.snapshot.is_empty());
    assert_eq!(
        summary
            .stats
            .count(TaskKind::ZoneTransfer, OutcomeKind::TransportError),
        1
    );
    assert_eq!(
        summary.stats.count(TaskKind::ZoneTransfer, OutcomeKind::Refused),
        1
    );
    let subjects: Vec<&str> = summary.failures.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(subjects, vec!["flaky", "strict"]);
}

#[tokio::test(start_paused = true)]
async fn test_probes_get_one_attempt_unless_enabled() {
    let resolver = Arc::new(SlowResolver {
        fail_transient: true,
        ..Default::default()
    });
    let collaborators = Collaborators::new(
        Arc::new(ScriptedTransfer::default()),
        resolver.clone(),
    );
    let target = target(&["ns1"], &["www"]);

    run_all(&target, &options(2), &collaborators, CancellationToken::new(), None).await;
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);

    let mut retrying = options(2);
    retrying.retry_probes = true;
    run_all(&target, &retrying, &collaborators, CancellationToken::new(), None).await;
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_panicking_task_is_contained() {
    let transfer = ScriptedTransfer::default().answer("ns1", Ok(zone(&["www", "mail"])));
    let collaborators = Collaborators::new(Arc::new(transfer), Arc::new(SlowResolver::default()));
    let mut opts = options(2);
    opts.retry = RetryConfig::single_attempt();

    let summary = run_all(
        &target(&["panic", "ns1"], &[]),
        &opts,
        &collaborators,
        CancellationToken::new(),
        None,
    )
    .await;

    assert_eq!(
        summary.snapshot.fqdns(),
        vec!["mail.example.com", "www.example.com"]
    );
    assert!(summary
        .snapshot
        .iter()
        .all(|name| name.source == Source::ZoneTransfer));
    let failure = &summary.failures[0];
    assert_eq!(failure.subject, "panic");
    assert_eq!(failure.outcome, OutcomeKind::TransportError);
    assert!(failure.detail.contains("collaborator bug"));
    assert_eq!(summary.completed_tasks, 2);
}

#[tokio::test]
async fn test_cancelled_before_start_dispatches_nothing() {
    let transfer = Arc::new(ScriptedTransfer::default().answer("ns1", Ok(zone(&["www"]))));
    let collaborators = Collaborators::new(transfer.clone(), Arc::new(SlowResolver::default()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = run_all(&target(&["ns1"], &["api"]), &options(2), &collaborators, cancel, None).await;

    assert!(summary.cancelled);
    assert!(summary.snapshot.is_empty());
    assert_eq!(summary.completed_tasks, 0);
    assert_eq!(transfer.calls("ns1"), 0);
    assert_eq!(summary.stats.count(TaskKind::ZoneTransfer, OutcomeKind::Cancelled), 1);
    assert_eq!(summary.stats.count(TaskKind::Probe, OutcomeKind::Cancelled), 1);
}

#[tokio::test]
async fn test_progress_callback_sees_every_settled_task() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let callback: ProgressCallback = Some(Arc::new(move |done, total| {
        recorder.lock().unwrap().push((done, total));
    }));
    let collaborators = Collaborators::new(
        Arc::new(ScriptedTransfer::default()),
        Arc::new(SlowResolver::default()),
    );

    run_all(
        &target(&["ns1"], &["a", "b"]),
        &options(1),
        &collaborators,
        CancellationToken::new(),
        callback,
    )
    .await;

    assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn test_run_options_from_config() {
    let config = Config {
        concurrency: 7,
        timeout: 3,
        retries: 4,
        backoff_ms: 250,
        retry_probes: true,
        ..Default::default()
    };
    let opts = RunOptions::from(&config);
    assert_eq!(opts.concurrency, 7);
    assert_eq!(opts.timeout, Duration::from_secs(3));
    assert_eq!(opts.retry.max_attempts, 5);
    assert_eq!(opts.retry.base_backoff, Duration::from_millis(250));
    assert!(opts.retry_probes);
}
