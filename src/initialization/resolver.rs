//! DNS resolver initialization.
//!
//! This module builds the resolver used for subdomain probes and nameserver
//! discovery with timeouts aligned to the run configuration.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};

use crate::config::DNS_PORT;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for subdomain probes.
///
/// With explicit `resolvers` (IP addresses) only those are queried. Otherwise
/// the system configuration is used, falling back to the hickory default
/// (Google public DNS) if it cannot be read.
///
/// The resolver makes a single attempt per query with the given timeout;
/// retries are left to the retry policy so they show up in the run statistics.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if a resolver address is not an IP.
pub fn init_resolver(
    resolvers: &[String],
    timeout: Duration,
) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let (config, mut opts) = if resolvers.is_empty() {
        match hickory_resolver::system_conf::read_system_conf() {
            Ok((config, opts)) => {
                debug!("Using system resolver configuration");
                (config, opts)
            }
            Err(e) => {
                warn!("Failed to read system resolver configuration ({e}), using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        }
    } else {
        let ips = resolvers
            .iter()
            .map(|r| {
                r.trim().parse::<IpAddr>().map_err(|_| {
                    InitializationError::DnsResolverError(format!(
                        "resolver must be an IP address, got {r:?}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let group = NameServerConfigGroup::from_ips_clear(&ips, DNS_PORT, true);
        (
            ResolverConfig::from_parts(None, Vec::new(), group),
            ResolverOpts::default(),
        )
    };

    opts.timeout = timeout;
    opts.attempts = 1;
    // Candidate names are always absolute; never append search domains
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}
