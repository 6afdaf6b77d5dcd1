//! zone_recon library: DNS zone transfer and subdomain brute-force reconnaissance
//!
//! This library attempts AXFR zone transfers against a set of nameservers and
//! probes a wordlist of candidate labels through standard resolution, all on
//! a bounded worker pool. Discoveries are deduplicated into one sorted
//! snapshot that can be exported as JSON, CSV, or text.
//!
//! # Example
//!
//! ```no_run
//! use zone_recon::{run_recon, Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     domain: "example.com".to_string(),
//!     nameservers: vec!["ns1.example.com".to_string()],
//!     subdomains: vec!["www".to_string(), "api".to_string()],
//!     ..Default::default()
//! };
//!
//! let report = run_recon(config, CancellationToken::new()).await?;
//! println!("Found {} subdomains", report.snapshot.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregator;
mod app;
pub mod config;
pub mod dns;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod models;
pub mod run;
pub mod utils;

// Re-export public API
pub use aggregator::{Aggregator, Snapshot};
pub use app::{build_target, collect_labels, read_wordlist, render_failures, render_report};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ConfigurationError, DnsError, ExportError, InitializationError};
pub use export::{export, write_output, ExportFormat};
pub use models::{AttemptOutcome, DiscoveredName, OutcomeKind, Source, Target, TaskKind};
pub use recon::{exit_code, run_recon, ReconReport};
pub use run::{run_all, Collaborators, ProgressCallback, RunOptions, RunSummary, TaskFailure};
pub use utils::{run_with_retry, RetryConfig};

// Wires configuration, collaborators, and the orchestrator together
mod recon {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::{Context, Result};
    use log::{info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::aggregator::Snapshot;
    use crate::app::{build_target, print_outcome_statistics};
    use crate::config::Config;
    use crate::dns::{AxfrClient, HickoryResolver};
    use crate::error_handling::{ConfigurationError, ProcessingStats};
    use crate::export::{export, write_output};
    use crate::initialization::init_resolver;
    use crate::run::{run_all, Collaborators, RunOptions, TaskFailure};

    /// Results of a reconnaissance run.
    #[derive(Debug, Clone)]
    pub struct ReconReport {
        /// Normalized target domain
        pub domain: String,
        /// Deduplicated discoveries, sorted by normalized fqdn
        pub snapshot: Snapshot,
        /// Nameservers and labels whose task did not succeed
        pub failures: Vec<TaskFailure>,
        /// Outcome counters per task kind
        pub stats: Arc<ProcessingStats>,
        /// Tasks dispatched or skipped
        pub total_tasks: usize,
        /// Tasks that settled with an outcome
        pub completed_tasks: usize,
        /// Whether the run was cut short by cancellation
        pub cancelled: bool,
        /// File the snapshot was exported to, if any
        pub output: Option<PathBuf>,
        /// Why the export file could not be written, if it failed
        pub output_error: Option<String>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs a full reconnaissance with the provided configuration.
    ///
    /// Validates the configuration, builds the target (reading the wordlist
    /// and discovering nameservers if requested), runs every task, and writes
    /// the export file when `config.output` is set.
    ///
    /// Cancelling `cancel` ends the run early; the partial results are still
    /// exported and returned.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The configuration is invalid (a `ConfigurationError` in the chain)
    /// - The wordlist file cannot be read
    /// - The resolver cannot be initialized
    ///
    /// Individual transfer or probe failures never cause an error. A failed
    /// export is reported through [`ReconReport::output_error`] so the
    /// discoveries are still returned.
    pub async fn run_recon(config: Config, cancel: CancellationToken) -> Result<ReconReport> {
        config.validate().context("Invalid configuration")?;

        let resolver = init_resolver(&config.resolvers, config.timeout_duration())
            .context("Failed to initialize DNS resolver")?;
        let target = build_target(&config, &resolver)
            .await
            .context("Invalid configuration")?;

        let collaborators = Collaborators::new(
            Arc::new(AxfrClient::new()),
            Arc::new(HickoryResolver::new(Arc::clone(&resolver))),
        );
        let options = RunOptions::from(&config);

        let summary = run_all(&target, &options, &collaborators, cancel, None).await;

        print_outcome_statistics(&summary.stats);
        info!(
            "Found {} unique subdomain(s) in {:.1}s",
            summary.snapshot.len(),
            summary.elapsed.as_secs_f64()
        );

        let mut output = None;
        let mut output_error = None;
        if let Some(path) = &config.output {
            let written = export(&summary.snapshot, config.format)
                .with_context(|| format!("Failed to encode results as {}", config.format))
                .and_then(|bytes| {
                    write_output(path, &bytes)
                        .with_context(|| format!("Failed to write {}", path.display()))
                });
            match written {
                Ok(()) => output = Some(path.clone()),
                Err(e) => {
                    warn!("{:#}", e);
                    output_error = Some(format!("{:#}", e));
                }
            }
        }

        Ok(ReconReport {
            domain: target.domain().to_string(),
            snapshot: summary.snapshot,
            failures: summary.failures,
            stats: summary.stats,
            total_tasks: summary.total_tasks,
            completed_tasks: summary.completed_tasks,
            cancelled: summary.cancelled,
            output,
            output_error,
            elapsed_seconds: summary.elapsed.as_secs_f64(),
        })
    }

    /// Maps the outcome of [`run_recon`] to a process exit code.
    ///
    /// - `0`: the run completed, whatever was found (zero discoveries included)
    /// - `2`: the configuration was rejected before any network work
    /// - `1`: any other fatal error, or the export file could not be written
    pub fn exit_code(outcome: &Result<ReconReport>) -> i32 {
        match outcome {
            Ok(report) if report.output_error.is_some() => 1,
            Ok(_) => 0,
            Err(e) if e.downcast_ref::<ConfigurationError>().is_some() => 2,
            Err(_) => 1,
        }
    }
}
