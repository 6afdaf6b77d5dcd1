//! Configuration constants.
//!
//! This module defines the defaults and limits used throughout the application:
//! timeouts, concurrency bounds, retry parameters, and built-in labels.

/// Default size of the worker pool (concurrent DNS operations)
pub const DEFAULT_CONCURRENCY: usize = 30;
/// Upper bound accepted for `--concurrency`
/// Each worker may hold one open socket, so this also caps open sockets
pub const MAX_CONCURRENCY: usize = 1000;
/// Progress logging interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

// Network operation timeouts
/// Per-call DNS timeout in seconds (zone transfer or address query)
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Port used for zone transfers when a nameserver is given without one
pub const DNS_PORT: u16 = 53;
/// Maximum number of records accepted from a single zone transfer
pub const MAX_ZONE_RECORDS: usize = 100_000;

// Retry strategy
/// Delay in milliseconds before the second attempt; doubles on every further attempt
pub const RETRY_BASE_BACKOFF_MS: u64 = 500;
/// Maximum number of attempts (including the initial attempt)
/// Set to 3 = initial attempt + 2 retries
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// Labels probed when neither `--subdomains` nor `--wordlist` is given.
pub const DEFAULT_SUBDOMAINS: &[&str] = &["www", "mail", "ftp", "test", "dev"];
