//! Error handling and batch statistics.
//!
//! This module provides:
//! - The `ErrorKind` taxonomy reported in results
//! - `TransportError`, the per-attempt failure returned by transports
//! - Initialization and entry-point error types
//! - reqwest error categorization and the read-timeout retry strategy
//! - Batch statistics tracking

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, get_retry_strategy, is_tls_want_read};
pub use stats::ProcessingStats;
pub use types::{ErrorKind, InitializationError, ReachableError, TransportError};
