//! Main application modules.
//!
//! This module provides target construction, progress logging, shutdown
//! handling, statistics printing, and report rendering used by the run.

pub mod logging;
pub mod report;
pub mod shutdown;
pub mod statistics;
pub mod target;

// Re-export public API
pub use logging::log_progress;
pub use report::{render_failures, render_report};
pub use shutdown::shutdown_gracefully;
pub use statistics::print_outcome_statistics;
pub use target::{build_target, collect_labels, read_wordlist};
