//! Subdomain probes.

use std::time::Duration;

use hickory_resolver::proto::rr::RecordType;
use log::debug;

use super::Resolve;
use crate::error_handling::DnsError;
use crate::models::{AttemptOutcome, DiscoveredName, Source};

/// Resolves `label.domain` once and classifies the result.
///
/// An NXDOMAIN or an empty answer is a definitive `NoAnswer`. Each returned
/// address becomes one `DiscoveredName` with the address as evidence.
pub async fn probe_subdomain(
    label: &str,
    domain: &str,
    resolver: &dyn Resolve,
    timeout: Duration,
) -> AttemptOutcome {
    let fqdn = format!("{label}.{domain}");

    match tokio::time::timeout(timeout, resolver.resolve(&fqdn, RecordType::A)).await {
        Err(_) => AttemptOutcome::Timeout,
        Ok(Ok(addresses)) if addresses.is_empty() => AttemptOutcome::NoAnswer,
        Ok(Ok(addresses)) => {
            for address in &addresses {
                debug!("Found subdomain: {fqdn} -> {address}");
            }
            AttemptOutcome::Success(
                addresses
                    .into_iter()
                    .map(|address| DiscoveredName::new(fqdn.clone(), Source::BruteForce, Some(address)))
                    .collect(),
            )
        }
        Ok(Err(error)) => match error {
            DnsError::NxDomain | DnsError::NoRecords => AttemptOutcome::NoAnswer,
            DnsError::Refused => AttemptOutcome::Refused,
            DnsError::Timeout => AttemptOutcome::Timeout,
            DnsError::Transport(msg) => AttemptOutcome::TransportError(msg),
        },
    }
}
