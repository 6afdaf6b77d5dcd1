//! Building the run target from configuration.

use std::collections::HashSet;
use std::path::Path;

use hickory_resolver::TokioAsyncResolver;
use log::{info, warn};

use crate::config::{Config, DEFAULT_SUBDOMAINS};
use crate::dns::lookup_ns_records;
use crate::error_handling::ConfigurationError;
use crate::models::Target;

/// Reads a wordlist file: one label per line, blank lines and `#` comments
/// skipped.
///
/// # Errors
///
/// Returns `ConfigurationError::WordlistUnreadable` if the file cannot be read.
pub async fn read_wordlist(path: &Path) -> Result<Vec<String>, ConfigurationError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|source| {
        ConfigurationError::WordlistUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Merges `--subdomains` and the wordlist file, in that order. Falls back to
/// the built-in labels when neither supplies any.
///
/// # Errors
///
/// Returns `ConfigurationError::WordlistUnreadable` if the file cannot be read.
pub async fn collect_labels(config: &Config) -> Result<Vec<String>, ConfigurationError> {
    let mut labels: Vec<String> = config.subdomains.clone();
    if let Some(path) = &config.wordlist {
        let from_file = read_wordlist(path).await?;
        info!("Loaded {} label(s) from {}", from_file.len(), path.display());
        labels.extend(from_file);
    }
    if labels.iter().all(|label| label.trim().is_empty()) {
        labels = DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect();
    }
    Ok(labels)
}

/// Builds the `Target`, optionally adding the domain's NS records to the
/// explicit nameservers.
///
/// A failed NS lookup is logged and ignored; the run proceeds with the
/// explicit nameservers, if any.
///
/// # Errors
///
/// Returns `ConfigurationError` if the domain is invalid, the wordlist is
/// unreadable, or no nameserver is left.
pub async fn build_target(
    config: &Config,
    resolver: &TokioAsyncResolver,
) -> Result<Target, ConfigurationError> {
    let labels = collect_labels(config).await?;

    let mut nameservers = config.nameservers.clone();
    if config.discover_nameservers {
        match lookup_ns_records(&config.domain, resolver).await {
            Ok(discovered) => {
                let known: HashSet<String> =
                    nameservers.iter().map(|ns| ns.to_ascii_lowercase()).collect();
                let added: Vec<String> = discovered
                    .into_iter()
                    .filter(|ns| !known.contains(&ns.to_ascii_lowercase()))
                    .collect();
                info!("Discovered {} additional nameserver(s)", added.len());
                nameservers.extend(added);
            }
            Err(e) => {
                warn!("Failed to look up NS records for {}: {e:#}", config.domain);
            }
        }
    }

    Target::new(&config.domain, nameservers, labels)
}
