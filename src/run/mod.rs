//! Concurrent orchestration of zone transfers and subdomain probes.
//!
//! `run_all` turns a `Target` into one task per nameserver and one per
//! wordlist label, runs them on a bounded worker pool, and returns the
//! aggregated snapshot once every task has settled.

mod progress;
mod task;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::aggregator::{Aggregator, Snapshot};
use crate::app::{log_progress, shutdown_gracefully};
use crate::config::{Config, DEFAULT_CONCURRENCY, DNS_TIMEOUT_SECS, LOGGING_INTERVAL};
use crate::dns::{Resolve, ZoneTransfer};
use crate::error_handling::ProcessingStats;
use crate::initialization::init_semaphore;
use crate::models::{OutcomeKind, TaskKind, Target};
use crate::utils::RetryConfig;

pub use progress::ProgressCallback;

use progress::Progress;
use task::{run_task, Job, TaskContext, TaskResult};

/// The network collaborators tasks talk to.
#[derive(Clone)]
pub struct Collaborators {
    /// Performs AXFR requests
    pub transfer: Arc<dyn ZoneTransfer>,
    /// Resolves candidate names
    pub resolver: Arc<dyn Resolve>,
}

impl Collaborators {
    pub fn new(transfer: Arc<dyn ZoneTransfer>, resolver: Arc<dyn Resolve>) -> Self {
        Self { transfer, resolver }
    }
}

/// Knobs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum tasks in flight. Zero is treated as one.
    pub concurrency: usize,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry policy for transient failures
    pub retry: RetryConfig,
    /// Apply `retry` to probes too; otherwise probes get a single attempt
    pub retry_probes: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            retry_probes: false,
        }
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency,
            timeout: config.timeout_duration(),
            retry: config.retry_config(),
            retry_probes: config.retry_probes,
        }
    }
}

/// A nameserver or label whose task did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub kind: TaskKind,
    /// Nameserver or wordlist label
    pub subject: String,
    pub outcome: OutcomeKind,
    /// Human-readable detail of the final attempt
    pub detail: String,
}

/// Everything a run produced.
pub struct RunSummary {
    /// Deduplicated discoveries, sorted by normalized fqdn
    pub snapshot: Snapshot,
    /// Outcome counters per task kind
    pub stats: Arc<ProcessingStats>,
    /// Reportable failures, sorted by task kind then subject
    pub failures: Vec<TaskFailure>,
    pub total_tasks: usize,
    /// Tasks that settled with an outcome (cancelled tasks excluded)
    pub completed_tasks: usize,
    /// Whether the run was cut short by the cancellation token
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Runs every zone transfer and probe for `target` and aggregates the results.
///
/// At most `options.concurrency` tasks are in flight; each attempt is bounded
/// by `options.timeout`. Individual failures never abort the run: they are
/// counted in `stats` and listed in `failures`.
///
/// Cancelling `cancel` stops dispatch, abandons in-flight attempts, and still
/// returns normally with whatever had been aggregated. `progress` is called
/// with `(completed, total)` each time a task settles.
pub async fn run_all(
    target: &Target,
    options: &RunOptions,
    collaborators: &Collaborators,
    cancel: CancellationToken,
    progress: ProgressCallback,
) -> RunSummary {
    let start_time = Instant::now();

    let jobs: Vec<Job> = target
        .nameservers()
        .iter()
        .map(|ns| Job::Transfer {
            nameserver: ns.clone(),
        })
        .chain(target.wordlist().iter().map(|label| Job::Probe {
            label: label.clone(),
        }))
        .collect();
    let total_tasks = jobs.len();
    let concurrency = options.concurrency.max(1);

    info!(
        "Starting reconnaissance of {}: {} zone transfer(s), {} probe(s), concurrency {}",
        target.domain(),
        target.nameservers().len(),
        target.wordlist().len(),
        concurrency
    );

    let aggregator = Arc::new(Aggregator::new());
    let stats = Arc::new(ProcessingStats::new());
    let progress = Arc::new(Progress::new(total_tasks, progress));
    let semaphore = init_semaphore(concurrency);
    let domain: Arc<str> = Arc::from(target.domain());

    let logging_cancel = CancellationToken::new();
    let logging_task = spawn_progress_logger(
        Arc::clone(&progress),
        start_time,
        logging_cancel.child_token(),
    );

    let mut tasks = FuturesUnordered::new();
    let mut pending = jobs.into_iter();
    for job in pending.by_ref() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Cancellation requested, stopping dispatch");
                stats.record(job.kind(), OutcomeKind::Cancelled);
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Worker pool closed, skipping {} task for {}", job.kind(), job.subject());
                    stats.record(job.kind(), OutcomeKind::Cancelled);
                    continue;
                }
            },
        };

        let ctx = TaskContext {
            domain: Arc::clone(&domain),
            collaborators: collaborators.clone(),
            options: *options,
            aggregator: Arc::clone(&aggregator),
            stats: Arc::clone(&stats),
            progress: Arc::clone(&progress),
            cancel: cancel.clone(),
        };
        let key = job.clone();
        let handle = tokio::spawn(run_task(job, ctx, permit));
        tasks.push(async move { (key, handle.await) });
    }
    for job in pending {
        stats.record(job.kind(), OutcomeKind::Cancelled);
    }

    let mut failures = Vec::new();
    while let Some((job, joined)) = tasks.next().await {
        match joined {
            Ok(result) => {
                if let Some(failure) = result.failure() {
                    failures.push(failure);
                }
            }
            Err(join_error) => {
                warn!("{} task for {} aborted: {}", job.kind(), job.subject(), join_error);
                stats.record(job.kind(), OutcomeKind::TransportError);
                progress.complete();
                let result = TaskResult {
                    job,
                    outcome: OutcomeKind::TransportError,
                    detail: format!("task aborted: {join_error}"),
                };
                failures.extend(result.failure());
            }
        }
    }
    failures.sort_by(|a, b| (a.kind, &a.subject).cmp(&(b.kind, &b.subject)));

    shutdown_gracefully(logging_cancel, Some(logging_task)).await;
    log_progress(start_time, progress.completed(), total_tasks);

    let cancelled = cancel.is_cancelled();
    if cancelled {
        info!(
            "Run cancelled after {}/{} tasks",
            progress.completed(),
            total_tasks
        );
    }

    RunSummary {
        snapshot: aggregator.snapshot(),
        stats,
        failures,
        total_tasks,
        completed_tasks: progress.completed(),
        cancelled,
        elapsed: start_time.elapsed(),
    }
}

fn spawn_progress_logger(
    progress: Arc<Progress>,
    start_time: Instant,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, progress.completed(), progress.total());
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests;
