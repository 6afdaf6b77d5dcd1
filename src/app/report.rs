//! Human-readable run report.

use std::fmt::Write;

use strum::IntoEnumIterator;

use crate::aggregator::Snapshot;
use crate::models::Source;
use crate::run::TaskFailure;

/// Renders the discovered names grouped by source.
///
/// Pure: the caller decides where the text goes. Sources without discoveries
/// are omitted; an empty snapshot renders a single "no subdomains" line.
pub fn render_report(domain: &str, snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.is_empty() {
        let _ = writeln!(out, "No subdomains found for {domain}.");
        return out;
    }

    let _ = writeln!(
        out,
        "Found {} unique subdomain{} for {}:",
        snapshot.len(),
        if snapshot.len() == 1 { "" } else { "s" },
        domain
    );
    for source in Source::iter() {
        let names: Vec<_> = snapshot.by_source(source).collect();
        if names.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{} ({}):", source, names.len());
        for name in names {
            match &name.evidence {
                Some(evidence) => {
                    let _ = writeln!(out, "  {} -> {}", name.key(), evidence);
                }
                None => {
                    let _ = writeln!(out, "  {}", name.key());
                }
            }
        }
    }
    out
}

/// Renders the failures section shown with `--verbose`.
pub fn render_failures(failures: &[TaskFailure]) -> String {
    let mut out = String::new();
    if failures.is_empty() {
        return out;
    }
    let _ = writeln!(out, "\nFailures ({}):", failures.len());
    for failure in failures {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            failure.kind, failure.subject, failure.detail
        );
    }
    out
}
