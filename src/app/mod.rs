//! Command-line application helpers.
//!
//! This module provides input reading and URL line validation, and the
//! statistics printed at the end of a run.

pub mod statistics;
pub mod url;

// Re-export public API
pub use statistics::{print_error_statistics, print_final_statistics};
pub use self::url::{collect_urls, read_urls, validate_and_normalize_url};
