//! DNS collaborators and single-attempt operations.
//!
//! This module provides:
//! - The collaborator contracts: `ZoneTransfer` (AXFR) and `Resolve` (record lookups)
//! - Their `hickory`-backed implementations (`AxfrClient`, `HickoryResolver`)
//! - `attempt_transfer`: one zone transfer try against one nameserver, classified
//! - `probe_subdomain`: one address lookup for one candidate label, classified
//! - NS record discovery for a domain
//!
//! The attempt functions never retry and never touch the aggregator, so they
//! can be tested with in-memory collaborators.

mod probe;
mod records;
mod resolution;
mod transfer;

use async_trait::async_trait;

use crate::error_handling::DnsError;

// Re-export public API
pub use hickory_resolver::proto::rr::RecordType;
pub use probe::probe_subdomain;
pub use records::lookup_ns_records;
pub use resolution::HickoryResolver;
pub use transfer::{attempt_transfer, AxfrClient};

/// One record returned by a zone transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Owner name relative to the zone origin (`@` for the apex)
    pub name: String,
    /// Record in presentation format
    pub text: String,
}

impl ZoneRecord {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Performs a full zone transfer of `domain` from `nameserver`.
#[async_trait]
pub trait ZoneTransfer: Send + Sync {
    /// Returns every record of the zone, or a classified failure.
    async fn transfer(&self, nameserver: &str, domain: &str) -> Result<Vec<ZoneRecord>, DnsError>;
}

/// Resolves names to record data.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Returns the record data of type `record_type` for `fqdn` in
    /// presentation format (addresses for A/AAAA).
    async fn resolve(&self, fqdn: &str, record_type: RecordType) -> Result<Vec<String>, DnsError>;
}
