// Shared test helpers: in-memory DNS collaborators and target builders.
//
// This module provides fakes used across multiple test files so no test
// touches the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use zone_recon::dns::{RecordType, Resolve, ZoneRecord, ZoneTransfer};
use zone_recon::{Collaborators, DnsError, RetryConfig, RunOptions, Target};

/// What a fake collaborator does for one nameserver or name.
#[derive(Clone)]
#[allow(dead_code)] // Not every variant is used by every test file
pub enum Behavior<T> {
    /// Answer immediately
    Answer(Result<T, DnsError>),
    /// Answer after a delay
    Delayed(Duration, Result<T, DnsError>),
    /// Never answer
    Hang,
}

impl<T> Behavior<T> {
    async fn play(self) -> Result<T, DnsError> {
        match self {
            Behavior::Answer(answer) => answer,
            Behavior::Delayed(delay, answer) => {
                tokio::time::sleep(delay).await;
                answer
            }
            Behavior::Hang => std::future::pending().await,
        }
    }
}

/// Zone transfer collaborator keyed by nameserver. Unknown nameservers refuse.
#[derive(Default)]
pub struct FakeTransfer {
    behaviors: HashMap<String, Behavior<Vec<ZoneRecord>>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, nameserver: &str, behavior: Behavior<Vec<ZoneRecord>>) -> Self {
        self.behaviors.insert(nameserver.to_string(), behavior);
        self
    }

    /// Shorthand for a transfer returning A records for `labels`.
    pub fn zone(self, nameserver: &str, labels: &[&str]) -> Self {
        self.on(nameserver, Behavior::Answer(Ok(records(labels))))
    }
}

#[async_trait]
impl ZoneTransfer for FakeTransfer {
    async fn transfer(&self, nameserver: &str, _domain: &str) -> Result<Vec<ZoneRecord>, DnsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .behaviors
            .get(nameserver)
            .cloned()
            .unwrap_or(Behavior::Answer(Err(DnsError::Refused)));
        behavior.play().await
    }
}

/// Resolver keyed by fqdn. Unknown names are NXDOMAIN.
#[derive(Default)]
pub struct FakeResolver {
    behaviors: HashMap<String, Behavior<Vec<String>>>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, fqdn: &str, behavior: Behavior<Vec<String>>) -> Self {
        self.behaviors.insert(fqdn.to_string(), behavior);
        self
    }

    /// Shorthand for a name resolving to `address`.
    pub fn address(self, fqdn: &str, address: &str) -> Self {
        self.on(fqdn, Behavior::Answer(Ok(vec![address.to_string()])))
    }
}

#[async_trait]
impl Resolve for FakeResolver {
    async fn resolve(&self, fqdn: &str, _record_type: RecordType) -> Result<Vec<String>, DnsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .behaviors
            .get(fqdn)
            .cloned()
            .unwrap_or(Behavior::Answer(Err(DnsError::NxDomain)));
        behavior.play().await
    }
}

/// Zone records for `labels`, in presentation format under example.com.
pub fn records(labels: &[&str]) -> Vec<ZoneRecord> {
    labels
        .iter()
        .map(|label| {
            ZoneRecord::new(
                *label,
                format!("{label}.example.com. 300 IN A 192.0.2.1"),
            )
        })
        .collect()
}

#[allow(dead_code)]
pub fn collaborators(transfer: FakeTransfer, resolver: FakeResolver) -> Collaborators {
    Collaborators::new(Arc::new(transfer), Arc::new(resolver))
}

#[allow(dead_code)]
pub fn target(domain: &str, nameservers: &[&str], labels: &[&str]) -> Target {
    Target::new(
        domain,
        nameservers.iter().map(|s| s.to_string()),
        labels.iter().map(|s| s.to_string()),
    )
    .expect("valid test target")
}

/// Options with short, deterministic retry timing.
#[allow(dead_code)]
pub fn fast_options(concurrency: usize) -> RunOptions {
    RunOptions {
        concurrency,
        timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_attempts: 3,
            base_backoff: Duration::from_millis(10),
        },
        retry_probes: false,
    }
}
