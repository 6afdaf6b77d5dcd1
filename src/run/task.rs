//! One unit of work: a zone transfer against a nameserver or a probe of a
//! wordlist label.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{debug, warn};
use tokio::sync::OwnedSemaphorePermit;
use tokio_util::sync::CancellationToken;

use crate::aggregator::Aggregator;
use crate::dns::{attempt_transfer, probe_subdomain};
use crate::error_handling::ProcessingStats;
use crate::models::{AttemptOutcome, OutcomeKind, TaskKind};
use crate::utils::{run_with_retry, RetryConfig};

use super::progress::Progress;
use super::{Collaborators, RunOptions, TaskFailure};

/// What a task works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Job {
    Transfer { nameserver: String },
    Probe { label: String },
}

impl Job {
    pub(crate) fn kind(&self) -> TaskKind {
        match self {
            Job::Transfer { .. } => TaskKind::ZoneTransfer,
            Job::Probe { .. } => TaskKind::Probe,
        }
    }

    /// Nameserver or label the task is about.
    pub(crate) fn subject(&self) -> &str {
        match self {
            Job::Transfer { nameserver } => nameserver,
            Job::Probe { label } => label,
        }
    }
}

/// Everything a spawned task needs. Owned so the task is `'static`.
pub(crate) struct TaskContext {
    pub(crate) domain: Arc<str>,
    pub(crate) collaborators: Collaborators,
    pub(crate) options: RunOptions,
    pub(crate) aggregator: Arc<Aggregator>,
    pub(crate) stats: Arc<ProcessingStats>,
    pub(crate) progress: Arc<Progress>,
    pub(crate) cancel: CancellationToken,
}

/// How a task settled.
#[derive(Debug)]
pub(crate) struct TaskResult {
    pub(crate) job: Job,
    pub(crate) outcome: OutcomeKind,
    pub(crate) detail: String,
}

impl TaskResult {
    /// Entry for the failure report, if this outcome deserves one.
    ///
    /// Every unsuccessful zone transfer is reported, since there are only a
    /// handful. Probes are reported only for transport errors and timeouts;
    /// a missing name is the expected result for most labels.
    pub(crate) fn failure(&self) -> Option<TaskFailure> {
        let reportable = match self.job.kind() {
            TaskKind::ZoneTransfer => {
                !matches!(self.outcome, OutcomeKind::Success | OutcomeKind::Cancelled)
            }
            TaskKind::Probe => self.outcome.is_failure(),
        };
        reportable.then(|| TaskFailure {
            kind: self.job.kind(),
            subject: self.job.subject().to_string(),
            outcome: self.outcome,
            detail: self.detail.clone(),
        })
    }
}

/// Runs one job to completion, holding `permit` until it settles.
///
/// Cancellation abandons the in-flight attempt. A panic inside the attempt is
/// contained here and reported as a transport error; it never reaches the
/// orchestrator or other tasks.
pub(crate) async fn run_task(
    job: Job,
    ctx: TaskContext,
    permit: OwnedSemaphorePermit,
) -> TaskResult {
    let _permit = permit;

    let work = execute(&job, &ctx);
    let settled = tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => None,
        result = AssertUnwindSafe(work).catch_unwind() => Some(match result {
            Ok(outcome) => outcome,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("{} task for {} panicked: {}", job.kind(), job.subject(), message);
                AttemptOutcome::TransportError(format!("task panicked: {message}"))
            }
        }),
    };

    let Some(outcome) = settled else {
        debug!("{} task for {} cancelled", job.kind(), job.subject());
        ctx.stats.record(job.kind(), OutcomeKind::Cancelled);
        return TaskResult {
            job,
            outcome: OutcomeKind::Cancelled,
            detail: "cancelled".to_string(),
        };
    };

    let kind = outcome.kind();
    let detail = outcome.describe();
    match outcome {
        AttemptOutcome::Success(names) => {
            let inserted = ctx.aggregator.submit(names);
            debug!(
                "{} task for {} succeeded ({}, {} new)",
                job.kind(),
                job.subject(),
                detail,
                inserted
            );
        }
        _ if kind.is_failure() => {
            warn!("{} task for {} failed: {}", job.kind(), job.subject(), detail);
        }
        _ => {
            debug!("{} task for {}: {}", job.kind(), job.subject(), detail);
        }
    }

    ctx.stats.record(job.kind(), kind);
    ctx.progress.complete();

    TaskResult {
        job,
        outcome: kind,
        detail,
    }
}

async fn execute(job: &Job, ctx: &TaskContext) -> AttemptOutcome {
    let domain = ctx.domain.as_ref();
    let timeout = ctx.options.timeout;
    match job {
        Job::Transfer { nameserver } => {
            let transfer = ctx.collaborators.transfer.as_ref();
            run_with_retry(
                || attempt_transfer(transfer, domain, nameserver, timeout),
                &ctx.options.retry,
            )
            .await
        }
        Job::Probe { label } => {
            let resolver = ctx.collaborators.resolver.as_ref();
            let retry = if ctx.options.retry_probes {
                ctx.options.retry
            } else {
                RetryConfig::single_attempt()
            };
            run_with_retry(
                || probe_subdomain(label, domain, resolver, timeout),
                &retry,
            )
            .await
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
