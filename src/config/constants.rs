//! Configuration constants.
//!
//! This module defines the constants used throughout the crate: timeouts,
//! jitter bounds, redirect limits, retry backoff and heuristic markers.

use std::time::Duration;

/// Default number of probes allowed in flight in concurrent mode.
pub const DEFAULT_WORKERS: usize = 10;

// Network operation timeouts
/// Read timeout in seconds for every network call
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
/// Connect timeout in seconds (TCP + TLS negotiation)
///
/// May be configured longer than the read timeout to tolerate slow TLS
/// negotiation behind constrained proxies.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Upper bound for the browser's network-idle wait after navigation
pub const BROWSER_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

// Jitter between requests
/// Lower bound of the random pause before each network attempt
pub const JITTER_MIN: Duration = Duration::from_millis(1000);
/// Upper bound of the random pause before each network attempt
pub const JITTER_MAX: Duration = Duration::from_millis(2000);

// Redirect handling
/// Maximum number of redirect hops followed after the initial request
pub const MAX_REDIRECT_DEPTH: usize = 5;

// Retry strategy (read timeouts only)
/// Base delay in milliseconds for the exponential backoff
pub const RETRY_BASE_DELAY_MS: u64 = 2;
/// Multiplier applied to the backoff (2ms base * 250 = 500ms first delay)
pub const RETRY_FACTOR: u64 = 250;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

// Response and body size limits
/// Maximum response body size in bytes (2MB)
/// Bodies larger than this are truncated; heuristics only look at the prefix
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Default User-Agent string, used when the rotating pool is empty.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Heuristic markers
/// Body marker injected by Cloudflare Web Analytics / bot management
pub const CLOUDFLARE_BODY_MARKER: &str = "cloudflareinsights.com";
/// Response header set by Cloudflare's edge
pub const CLOUDFLARE_RAY_HEADER: &str = "cf-ray";
/// Both markers must be present for a page to be flagged as a JS redirect
pub const JS_REDIRECT_MARKERS: [&str; 2] = ["DOMContentLoaded", "location.href"];
