//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DNS_TIMEOUT_SECS, MAX_CONCURRENCY, RETRY_BASE_BACKOFF_MS,
    RETRY_MAX_ATTEMPTS,
};
use crate::error_handling::ConfigurationError;
use crate::export::ExportFormat;
use crate::models::{is_valid_name, normalize_fqdn};
use crate::utils::RetryConfig;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Run configuration.
///
/// Parsed from the command line by the binary, but it can equally be
/// constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use zone_recon::Config;
///
/// let config = Config {
///     domain: "example.com".to_string(),
///     nameservers: vec!["ns1.example.com".to_string()],
///     concurrency: 50,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "zone_recon",
    version,
    about = "Attempt DNS zone transfers and brute-force subdomains for a domain"
)]
pub struct Config {
    /// Target domain for enumeration
    #[arg(short = 'd', long)]
    pub domain: String,

    /// Nameservers to request zone transfers from (host, IP, or IP:port)
    #[arg(short = 'n', long, num_args = 1..)]
    pub nameservers: Vec<String>,

    /// Subdomain labels to probe
    #[arg(short = 's', long, num_args = 1..)]
    pub subdomains: Vec<String>,

    /// File with one subdomain label per line (merged with --subdomains)
    #[arg(short = 'w', long)]
    pub wordlist: Option<PathBuf>,

    /// Write discovered subdomains to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output file format
    #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,

    /// Maximum concurrent DNS operations
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-call timeout in seconds
    #[arg(short = 't', long, default_value_t = DNS_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Retries after the first attempt for transient failures
    #[arg(short = 'r', long, default_value_t = RETRY_MAX_ATTEMPTS - 1)]
    pub retries: usize,

    /// Delay before the first retry in milliseconds (doubles on each retry)
    #[arg(long, default_value_t = RETRY_BASE_BACKOFF_MS)]
    pub backoff_ms: u64,

    /// Also retry subdomain probes that fail with transport errors or timeouts
    #[arg(long)]
    pub retry_probes: bool,

    /// Resolver IPs used for subdomain probes (defaults to system configuration)
    #[arg(long = "resolver")]
    pub resolvers: Vec<String>,

    /// Add the domain's NS records to the zone transfer targets
    #[arg(long)]
    pub discover_nameservers: bool,

    /// Include failed nameservers and labels in the final report
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: String::new(),
            nameservers: Vec::new(),
            subdomains: Vec::new(),
            wordlist: None,
            output: None,
            format: ExportFormat::Text,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DNS_TIMEOUT_SECS,
            retries: RETRY_MAX_ATTEMPTS - 1,
            backoff_ms: RETRY_BASE_BACKOFF_MS,
            retry_probes: false,
            resolvers: Vec::new(),
            discover_nameservers: false,
            verbose: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the values that can be verified without touching the network.
    ///
    /// The wordlist file is checked later when it is read.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let domain = normalize_fqdn(&self.domain);
        if domain.is_empty() {
            return Err(ConfigurationError::EmptyDomain);
        }
        if !is_valid_name(&domain) {
            return Err(ConfigurationError::InvalidDomain(domain));
        }
        if self.nameservers.iter().all(|ns| ns.trim().is_empty()) && !self.discover_nameservers
        {
            return Err(ConfigurationError::NoNameservers);
        }
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ConfigurationError::InvalidConcurrency(self.concurrency));
        }
        if self.timeout == 0 {
            return Err(ConfigurationError::InvalidTimeout);
        }
        if self.retries > 0 && self.backoff_ms == 0 {
            return Err(ConfigurationError::InvalidBackoff);
        }
        Ok(())
    }

    /// Per-call timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Retry policy derived from `--retries` and `--backoff-ms`.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.retries.saturating_add(1),
            base_backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}
