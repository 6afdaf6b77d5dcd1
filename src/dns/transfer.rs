//! Zone transfer (AXFR) attempts.
//!
//! `attempt_transfer` classifies a single try; `AxfrClient` is the network
//! implementation of the `ZoneTransfer` contract.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_resolver::proto::rr::{Name, RecordType};
use hickory_resolver::proto::serialize::binary::BinEncodable;
use log::{debug, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::{ZoneRecord, ZoneTransfer};
use crate::config::{DNS_PORT, MAX_ZONE_RECORDS};
use crate::error_handling::DnsError;
use crate::models::{normalize_fqdn, AttemptOutcome, DiscoveredName, Source};

/// Performs one zone transfer try of `domain` against `nameserver`.
///
/// # Arguments
///
/// * `transfer` - The zone transfer collaborator
/// * `domain` - The zone to transfer (already normalized)
/// * `nameserver` - Host, IP, or IP:port of the server
/// * `timeout` - Upper bound for the whole transfer
///
/// # Returns
///
/// - `Success` with one `DiscoveredName` per zone record
/// - `NoAnswer` for an empty transfer or a nonexistent zone
/// - `Refused` when the server declines the transfer
/// - `Timeout` when `timeout` elapses
/// - `TransportError` for connection or message failures
pub async fn attempt_transfer(
    transfer: &dyn ZoneTransfer,
    domain: &str,
    nameserver: &str,
    timeout: Duration,
) -> AttemptOutcome {
    match tokio::time::timeout(timeout, transfer.transfer(nameserver, domain)).await {
        Err(_) => AttemptOutcome::Timeout,
        Ok(Ok(records)) if records.is_empty() => AttemptOutcome::NoAnswer,
        Ok(Ok(records)) => {
            info!(
                "Successful zone transfer of {domain} from {nameserver} ({} records)",
                records.len()
            );
            let names = records
                .into_iter()
                .map(|record| {
                    DiscoveredName::new(
                        qualify(&record.name, domain),
                        Source::ZoneTransfer,
                        Some(record.text),
                    )
                })
                .collect();
            AttemptOutcome::Success(names)
        }
        Ok(Err(error)) => match error {
            DnsError::Refused => AttemptOutcome::Refused,
            DnsError::NxDomain | DnsError::NoRecords => AttemptOutcome::NoAnswer,
            DnsError::Timeout => AttemptOutcome::Timeout,
            DnsError::Transport(msg) => AttemptOutcome::TransportError(msg),
        },
    }
}

/// Joins a zone-relative owner name with the domain. The apex maps to the
/// domain itself.
fn qualify(name: &str, domain: &str) -> String {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() || name == "@" {
        domain.to_string()
    } else {
        format!("{name}.{domain}")
    }
}

/// AXFR over TCP using `hickory-proto` message encoding.
#[derive(Debug, Clone)]
pub struct AxfrClient {
    port: u16,
    max_records: usize,
}

impl Default for AxfrClient {
    fn default() -> Self {
        Self {
            port: DNS_PORT,
            max_records: MAX_ZONE_RECORDS,
        }
    }
}

impl AxfrClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum records accepted before the transfer is aborted.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    async fn connect(&self, nameserver: &str) -> io::Result<TcpStream> {
        if let Ok(addr) = nameserver.parse::<SocketAddr>() {
            return TcpStream::connect(addr).await;
        }
        if let Ok(ip) = nameserver.parse::<IpAddr>() {
            return TcpStream::connect((ip, self.port)).await;
        }
        TcpStream::connect((nameserver, self.port)).await
    }
}

#[async_trait]
impl ZoneTransfer for AxfrClient {
    async fn transfer(&self, nameserver: &str, domain: &str) -> Result<Vec<ZoneRecord>, DnsError> {
        let zone = normalize_fqdn(domain);
        let query_id = rand::random::<u16>();
        let query = build_axfr_query(&zone, query_id)?;

        let mut stream = self.connect(nameserver).await.map_err(transport)?;
        let len = u16::try_from(query.len())
            .map_err(|_| DnsError::Transport("AXFR query too large".to_string()))?;
        stream.write_all(&len.to_be_bytes()).await.map_err(transport)?;
        stream.write_all(&query).await.map_err(transport)?;
        stream.flush().await.map_err(transport)?;

        let mut records = Vec::new();
        let mut soa_seen = 0usize;

        loop {
            let mut len_buf = [0u8; 2];
            match stream.read_exact(&mut len_buf).await {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    if records.is_empty() {
                        // Server closed without sending any zone data
                        return Ok(records);
                    }
                    return Err(DnsError::Transport(
                        "zone transfer ended before the closing SOA".to_string(),
                    ));
                }
                Err(e) => return Err(transport(e)),
            }

            let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
            stream.read_exact(&mut buf).await.map_err(transport)?;
            let response = Message::from_vec(&buf)
                .map_err(|e| DnsError::Transport(format!("malformed response: {e}")))?;
            if response.id() != query_id {
                return Err(DnsError::Transport(format!(
                    "response id {} does not match query id {query_id}",
                    response.id()
                )));
            }

            match response.response_code() {
                ResponseCode::NoError => {}
                ResponseCode::Refused | ResponseCode::NotAuth => return Err(DnsError::Refused),
                ResponseCode::NXDomain => return Err(DnsError::NxDomain),
                other => {
                    return Err(DnsError::Transport(format!(
                        "server answered {other:?}"
                    )))
                }
            }

            if response.answers().is_empty() {
                return Ok(records);
            }

            for record in response.answers() {
                if record.record_type() == RecordType::SOA {
                    soa_seen += 1;
                    // The stream opens and closes with the zone's SOA
                    if soa_seen == 2 {
                        return Ok(records);
                    }
                }

                let owner = normalize_fqdn(&record.name().to_utf8());
                let Some(name) = relative_name(&owner, &zone) else {
                    debug!("Skipping out-of-zone record {owner} from {nameserver}");
                    continue;
                };
                records.push(ZoneRecord::new(name, record.to_string()));

                if records.len() > self.max_records {
                    return Err(DnsError::Transport(format!(
                        "zone exceeds {} records",
                        self.max_records
                    )));
                }
            }
        }
    }
}

fn build_axfr_query(zone: &str, id: u16) -> Result<Vec<u8>, DnsError> {
    let name = Name::from_str(&format!("{zone}."))
        .map_err(|e| DnsError::Transport(format!("invalid zone name {zone}: {e}")))?;

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .add_query(Query::query(name, RecordType::AXFR));

    message
        .to_bytes()
        .map_err(|e| DnsError::Transport(format!("failed to encode AXFR query: {e}")))
}

/// Owner name relative to `zone`, `@` for the apex, `None` outside the zone.
fn relative_name(owner: &str, zone: &str) -> Option<String> {
    if owner == zone {
        return Some("@".to_string());
    }
    owner
        .strip_suffix(zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
}

fn transport(error: io::Error) -> DnsError {
    match error.kind() {
        io::ErrorKind::TimedOut => DnsError::Timeout,
        _ => DnsError::Transport(error.to_string()),
    }
}
