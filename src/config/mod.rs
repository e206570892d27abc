//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, jitter, redirect depth, markers)
//! - The default browser-like request header set
//! - CLI option types and transport settings

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{ClientConfig, Config, LogFormat, LogLevel};
