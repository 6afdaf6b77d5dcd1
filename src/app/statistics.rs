//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::ProcessingStats;
use crate::models::{OutcomeKind, TaskKind};

/// Prints per-kind outcome counts to the log.
pub fn print_outcome_statistics(stats: &ProcessingStats) {
    for task in TaskKind::iter() {
        let total = stats.total(task);
        if total == 0 {
            continue;
        }
        info!(
            "{} outcomes ({} total, {} failed):",
            task.as_str(),
            total,
            stats.total_failures(task)
        );
        for outcome in OutcomeKind::iter() {
            let count = stats.count(task, outcome);
            if count > 0 {
                info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_outcome_statistics_empty() {
        print_outcome_statistics(&ProcessingStats::new());
    }

    #[test]
    fn test_print_outcome_statistics_mixed() {
        let stats = ProcessingStats::new();
        stats.record(TaskKind::ZoneTransfer, OutcomeKind::Refused);
        stats.record(TaskKind::Probe, OutcomeKind::Success);
        stats.record(TaskKind::Probe, OutcomeKind::Cancelled);
        print_outcome_statistics(&stats);
    }
}
