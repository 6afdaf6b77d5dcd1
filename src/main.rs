//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `zone_recon` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C cancellation
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::process;
use tokio_util::sync::CancellationToken;

use zone_recon::initialization::init_logger_with;
use zone_recon::{exit_code, render_failures, render_report, run_recon, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with partial results");
            ctrl_c_cancel.cancel();
        }
    });

    let verbose = config.verbose;
    let outcome = run_recon(config, cancel).await;
    match &outcome {
        Ok(report) => {
            print!("{}", render_report(&report.domain, &report.snapshot));
            if verbose {
                print!("{}", render_failures(&report.failures));
            }
            if report.cancelled {
                println!(
                    "Cancelled after {}/{} tasks; results are partial",
                    report.completed_tasks, report.total_tasks
                );
            }
            if let Some(path) = &report.output {
                println!("Results saved in {}", path.display());
            }
            if let Some(reason) = &report.output_error {
                eprintln!("zone_recon error: {}", reason);
            }
        }
        Err(e) => eprintln!("zone_recon error: {:#}", e),
    }

    let code = exit_code(&outcome);
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
