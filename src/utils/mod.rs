//! Utility functions shared by the attempt functions and the orchestrator.
//!
//! This module provides:
//! - Bounded retry with deterministic exponential backoff

mod retry;

pub use retry::{run_with_retry, DoublingBackoff, RetryConfig};
