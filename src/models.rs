//! Core value types shared by the attempt functions, the aggregator, and the
//! orchestrator.

use std::fmt;

use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::ConfigurationError;

/// Normalizes a DNS name for comparison: trims whitespace, strips trailing
/// dots, and lowercases.
pub fn normalize_fqdn(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// The reconnaissance target. Built once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    domain: String,
    nameservers: Vec<String>,
    wordlist: Vec<String>,
}

impl Target {
    /// Builds a target from raw inputs.
    ///
    /// The domain is normalized. Blank nameservers and labels are dropped,
    /// labels are normalized, and duplicates are removed keeping first order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the domain is empty or malformed, or if
    /// no nameserver remains.
    pub fn new(
        domain: &str,
        nameservers: impl IntoIterator<Item = String>,
        wordlist: impl IntoIterator<Item = String>,
    ) -> Result<Self, ConfigurationError> {
        let domain = normalize_fqdn(domain);
        if domain.is_empty() {
            return Err(ConfigurationError::EmptyDomain);
        }
        if !is_valid_name(&domain) {
            return Err(ConfigurationError::InvalidDomain(domain));
        }

        let mut seen_ns = std::collections::HashSet::new();
        let nameservers: Vec<String> = nameservers
            .into_iter()
            .map(|ns| ns.trim().trim_end_matches('.').to_string())
            .filter(|ns| !ns.is_empty())
            .filter(|ns| seen_ns.insert(ns.to_ascii_lowercase()))
            .collect();
        if nameservers.is_empty() {
            return Err(ConfigurationError::NoNameservers);
        }

        let mut seen_labels = std::collections::HashSet::new();
        let wordlist = wordlist
            .into_iter()
            .map(|label| normalize_fqdn(&label))
            .filter(|label| !label.is_empty())
            .filter(|label| seen_labels.insert(label.clone()))
            .collect();

        Ok(Target {
            domain,
            nameservers,
            wordlist,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn nameservers(&self) -> &[String] {
        &self.nameservers
    }

    pub fn wordlist(&self) -> &[String] {
        &self.wordlist
    }

    /// Number of tasks a full run dispatches.
    pub fn task_count(&self) -> usize {
        self.nameservers.len() + self.wordlist.len()
    }
}

/// Whether `name` (already normalized) can be sent as a DNS query name.
pub(crate) fn is_valid_name(name: &str) -> bool {
    name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

/// How a name was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro)]
pub enum Source {
    ZoneTransfer,
    BruteForce,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ZoneTransfer => "Zone transfer",
            Source::BruteForce => "Brute force",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered subdomain with the evidence that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredName {
    pub fqdn: String,
    pub source: Source,
    /// Raw record text (zone transfer) or resolved address (brute force)
    pub evidence: Option<String>,
}

impl DiscoveredName {
    pub fn new(fqdn: impl Into<String>, source: Source, evidence: Option<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            source,
            evidence,
        }
    }

    /// Deduplication key: lowercase, no trailing dot.
    pub fn key(&self) -> String {
        normalize_fqdn(&self.fqdn)
    }
}

/// Result of a single zone transfer attempt or subdomain probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(Vec<DiscoveredName>),
    NoAnswer,
    Refused,
    TransportError(String),
    Timeout,
}

impl AttemptOutcome {
    /// Transport errors and timeouts may succeed on another try; everything
    /// else is a definitive answer.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::TransportError(_) | AttemptOutcome::Timeout
        )
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptOutcome::Success(_) => OutcomeKind::Success,
            AttemptOutcome::NoAnswer => OutcomeKind::NoAnswer,
            AttemptOutcome::Refused => OutcomeKind::Refused,
            AttemptOutcome::TransportError(_) => OutcomeKind::TransportError,
            AttemptOutcome::Timeout => OutcomeKind::Timeout,
        }
    }

    /// Human-readable detail for reports and logs.
    pub fn describe(&self) -> String {
        match self {
            AttemptOutcome::Success(names) => format!("{} record(s)", names.len()),
            AttemptOutcome::NoAnswer => "no answer".to_string(),
            AttemptOutcome::Refused => "refused".to_string(),
            AttemptOutcome::TransportError(msg) => format!("transport error: {msg}"),
            AttemptOutcome::Timeout => "timed out".to_string(),
        }
    }
}

/// Outcome category used for statistics. `Cancelled` marks tasks abandoned
/// by a cancellation signal; it never comes out of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum OutcomeKind {
    Success,
    NoAnswer,
    Refused,
    TransportError,
    Timeout,
    Cancelled,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "Success",
            OutcomeKind::NoAnswer => "No answer",
            OutcomeKind::Refused => "Refused",
            OutcomeKind::TransportError => "Transport error",
            OutcomeKind::Timeout => "Timeout",
            OutcomeKind::Cancelled => "Cancelled",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, OutcomeKind::TransportError | OutcomeKind::Timeout)
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of work the orchestrator dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro)]
pub enum TaskKind {
    ZoneTransfer,
    Probe,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::ZoneTransfer => "Zone transfer",
            TaskKind::Probe => "Subdomain probe",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
