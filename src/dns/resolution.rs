//! Address resolution through `hickory-resolver`.
//!
//! This module adapts `TokioAsyncResolver` to the `Resolve` contract and maps
//! resolver errors onto the `DnsError` taxonomy.

use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::Resolve;
use crate::error_handling::DnsError;

/// `Resolve` implementation backed by a shared hickory resolver.
#[derive(Clone)]
pub struct HickoryResolver {
    inner: Arc<TokioAsyncResolver>,
}

impl HickoryResolver {
    pub fn new(inner: Arc<TokioAsyncResolver>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Resolve for HickoryResolver {
    async fn resolve(&self, fqdn: &str, record_type: RecordType) -> Result<Vec<String>, DnsError> {
        // Absolute name so no search domain gets appended
        let name = format!("{}.", fqdn.trim_end_matches('.'));
        match self.inner.lookup(name, record_type).await {
            Ok(lookup) => Ok(lookup.iter().filter_map(rdata_to_string).collect()),
            Err(e) => Err(classify_resolve_error(&e)),
        }
    }
}

fn rdata_to_string(rdata: &RData) -> Option<String> {
    match rdata {
        RData::A(a) => Some(a.to_string()),
        RData::AAAA(aaaa) => Some(aaaa.to_string()),
        RData::CNAME(_) => None,
        other => Some(other.to_string()),
    }
}

/// Maps a resolver error onto the collaborator failure taxonomy.
pub(crate) fn classify_resolve_error(error: &ResolveError) -> DnsError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NXDomain => DnsError::NxDomain,
            ResponseCode::Refused => DnsError::Refused,
            ResponseCode::ServFail => DnsError::Transport("server failure (SERVFAIL)".to_string()),
            _ => DnsError::NoRecords,
        },
        ResolveErrorKind::Timeout => DnsError::Timeout,
        _ => DnsError::Transport(error.to_string()),
    }
}
