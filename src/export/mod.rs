//! Export of discovered subdomains.
//!
//! Every format carries only the normalized fqdns, sorted lexicographically,
//! so the same snapshot always encodes to the same bytes regardless of the
//! order in which tasks finished.

mod types;

use std::io::Write;
use std::path::Path;

use csv::Writer;
use log::info;

use crate::aggregator::Snapshot;
use crate::error_handling::ExportError;

pub use types::ExportFormat;

/// Encodes the snapshot's fqdns in `format`.
///
/// - `Json`: a pretty-printed array of strings
/// - `Csv`: a `Subdomain` header, then one row per name
/// - `Text`: one name per line, newline-terminated
///
/// An empty snapshot yields `[]`, a header-only CSV, or empty text.
///
/// # Errors
///
/// Returns `ExportError` if the encoder fails.
pub fn export(snapshot: &Snapshot, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let fqdns = sorted_fqdns(snapshot);
    match format {
        ExportFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(&fqdns)?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        ExportFormat::Csv => {
            let mut writer = Writer::from_writer(Vec::new());
            writer.write_record(["Subdomain"])?;
            for fqdn in &fqdns {
                writer.write_record([fqdn])?;
            }
            writer
                .into_inner()
                .map_err(|e| ExportError::Io(e.into_error()))
        }
        ExportFormat::Text => {
            let mut bytes = Vec::new();
            for fqdn in &fqdns {
                writeln!(bytes, "{fqdn}")?;
            }
            Ok(bytes)
        }
    }
}

/// Writes `bytes` to `path`, creating or truncating it.
///
/// # Errors
///
/// Returns `ExportError::Io` if the file cannot be written.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes)?;
    info!("Results saved in {}", path.display());
    Ok(())
}

/// Snapshot order already is key order; sorting again keeps the guarantee
/// local to the encoder.
fn sorted_fqdns(snapshot: &Snapshot) -> Vec<String> {
    let mut fqdns = snapshot.fqdns();
    fqdns.sort();
    fqdns.dedup();
    fqdns
}
