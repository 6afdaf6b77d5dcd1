//! Nameserver discovery.

use anyhow::{Error, Result};
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::resolution::classify_resolve_error;
use crate::error_handling::DnsError;

/// Queries NS (nameserver) records for a domain.
///
/// # Arguments
///
/// * `domain` - The domain to query
/// * `resolver` - The DNS resolver instance
///
/// # Returns
///
/// A vector of nameserver hostnames without trailing dots, or an empty vector
/// if the domain has no NS records.
///
/// # Errors
///
/// Timeouts and transport failures are propagated so the caller can decide
/// whether a run without discovered nameservers is still useful.
pub async fn lookup_ns_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    let name = format!("{}.", domain.trim_end_matches('.'));
    match resolver.lookup(name, RecordType::NS).await {
        Ok(lookup) => {
            let nameservers: Vec<String> = lookup
                .iter()
                .filter_map(|rdata| {
                    if let RData::NS(ns) = rdata {
                        Some(ns.to_utf8().trim_end_matches('.').to_string())
                    } else {
                        None
                    }
                })
                .collect();
            Ok(nameservers)
        }
        Err(e) => match classify_resolve_error(&e) {
            // A domain without NS records is not a failure
            DnsError::NxDomain | DnsError::NoRecords => Ok(Vec::new()),
            _ => {
                log::warn!("Failed to lookup NS records for {domain}: {e}");
                Err(e.into())
            }
        },
    }
}
