//! Error handling and outcome statistics.
//!
//! This module provides:
//! - Error type definitions (configuration, initialization, collaborator, export)
//! - Outcome statistics tracking per task kind
//!
//! Configuration errors are fatal. DNS failures are classified into outcomes
//! and only ever counted and reported, never propagated.

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{ConfigurationError, DnsError, ExportError, InitializationError};
