//! Progress logging utilities.

use log::info;

/// Logs progress information about settled tasks.
///
/// # Arguments
///
/// * `start_time` - The start time of the run
/// * `completed` - Tasks settled so far
/// * `total` - Tasks in the run
pub fn log_progress(start_time: std::time::Instant, completed: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    let percent = if total > 0 {
        completed as f64 * 100.0 / total as f64
    } else {
        100.0
    };
    info!(
        "Settled {}/{} tasks ({:.0}%) in {:.2} seconds (~{:.2} tasks/sec)",
        completed, total, percent, elapsed_secs, rate
    );
}
