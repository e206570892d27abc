//! Probing one URL: request policy, redirects and response heuristics.
//!
//! This module provides:
//! - `do_request()` - HEAD-then-GET request executor
//! - `follow_redirect()` / `handle_redirect()` - manual redirect resolution
//! - `is_parking_domain()` - random-path probe for catch-all hosts
//! - Cloudflare and JS redirect body/header heuristics

mod detection;
mod parking;
mod redirects;
mod request;

// Re-export public API
pub use detection::{has_js_redirect, is_cloudflare_protected};
pub use parking::is_parking_domain;
pub use redirects::{follow_redirect, handle_redirect, next_location, RedirectTrace};
pub use request::{do_request, RequestOutcome, RequestPolicy};
