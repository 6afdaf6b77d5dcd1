//! Error type definitions.
//!
//! This module defines the typed errors used throughout the application.
//! Classified DNS outcomes are not errors; see `crate::models::AttemptOutcome`.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for invalid input configuration.
///
/// These are fatal and surface before any network work starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// No target domain was given.
    #[error("Target domain must not be empty")]
    EmptyDomain,

    /// The target domain contains characters or labels that cannot form a DNS name.
    #[error("Invalid target domain: {0}")]
    InvalidDomain(String),

    /// No nameserver to attempt zone transfers against.
    #[error("At least one nameserver is required (or enable nameserver discovery)")]
    NoNameservers,

    /// Worker pool size out of range.
    #[error("Concurrency must be between 1 and {max}, got {0}", max = crate::config::MAX_CONCURRENCY)]
    InvalidConcurrency(usize),

    /// Per-call timeout of zero.
    #[error("Timeout must be a positive number of seconds")]
    InvalidTimeout,

    /// Retries requested with a zero backoff.
    #[error("Retry backoff must be a positive number of milliseconds when retries are enabled")]
    InvalidBackoff,

    /// The wordlist file could not be read.
    #[error("Failed to read wordlist {}", .path.display())]
    WordlistUnreadable {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization failed")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Failure reported by a DNS collaborator (zone transfer or resolver).
///
/// Collaborators classify their own failures into this taxonomy; the attempt
/// functions then turn it into an `AttemptOutcome`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The queried name does not exist.
    #[error("NXDOMAIN")]
    NxDomain,

    /// The name exists but has no records of the requested type.
    #[error("no records found")]
    NoRecords,

    /// The server declined the request (policy decision, not a glitch).
    #[error("request refused by server")]
    Refused,

    /// The operation did not finish in time.
    #[error("operation timed out")]
    Timeout,

    /// Connection, resolution, or message-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Error types for result export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// JSON encoding failed.
    #[error("JSON export failed")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failed.
    #[error("CSV export failed")]
    Csv(#[from] csv::Error),

    /// Writing the output file failed.
    #[error("Failed to write output")]
    Io(#[from] std::io::Error),
}
