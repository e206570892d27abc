//! HTTP redirect chain resolution.
//!
//! Redirects are followed manually so that every hop is recorded and goes
//! through the same HEAD-then-GET policy as the initial request.

use std::net::IpAddr;

use log::{debug, warn};
use reqwest::header::LOCATION;
use reqwest::Url;
use serde::Serialize;

use super::request::{do_request, RequestOutcome, RequestPolicy};
use crate::client::{ResponseSnapshot, Transport};
use crate::config::MAX_REDIRECT_DEPTH;
use crate::domain::{tld_match, DomainParts};
use crate::error_handling::ErrorKind;

/// What happened after the first redirect response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedirectTrace {
    /// URLs requested while following redirects, first-visited first
    pub chain: Vec<String>,
    /// URL of the terminal response, if one was obtained
    pub final_url: Option<String>,
    /// Whether the final URL's registrable domain loosely matches the original
    pub tld_match: bool,
}

impl RedirectTrace {
    /// One-hop trace for transports that follow redirects internally.
    pub fn synthesized(original_url: &str, final_url: &str) -> Self {
        Self {
            chain: vec![final_url.to_string()],
            final_url: Some(final_url.to_string()),
            tld_match: tld_match(original_url, final_url, false),
        }
    }
}

/// Target of a redirect response.
///
/// A `Location` that does not name a host (`/login`, `?next=1`,
/// `page2.html`) is resolved against the response URL, keeping its scheme,
/// host and port. A scheme-less location naming a host (`www.a.com/home`,
/// `//cdn.a.com/x`) inherits the response URL's scheme. Returns `None` when
/// the header is missing or empty.
pub fn next_location(response: &ResponseSnapshot) -> Option<String> {
    let location = response.header(LOCATION.as_str())?.trim();
    if location.is_empty() {
        return None;
    }
    if location.contains("://") {
        return Some(location.to_string());
    }

    let base = Url::parse(response.url()).ok();
    let scheme = base.as_ref().map_or("https", Url::scheme);
    if location.starts_with("//") {
        return Some(format!("{scheme}:{location}"));
    }
    if !names_host(location) {
        return match base.as_ref() {
            Some(base) => base.join(location).ok().map(String::from),
            None => Some(location.to_string()),
        };
    }
    Some(format!("{scheme}://{location}"))
}

/// A scheme-less location names a host only when it starts with an IP or a
/// name under a known public suffix; `next` and `page2.html` are paths.
fn names_host(location: &str) -> bool {
    let parts = DomainParts::parse(location);
    if parts.domain.is_empty() {
        return false;
    }
    !parts.suffix.is_empty() || parts.domain.parse::<IpAddr>().is_ok()
}

/// Follows redirects starting at `start_url`, requesting at most `max_depth`
/// URLs.
///
/// Returns the terminal outcome and the URLs requested, in order. When every
/// one of the `max_depth` requests answered with a redirect, the outcome is
/// [`ErrorKind::MaxDepthReached`] and the chain holds `max_depth` entries. A
/// transport failure ends the chain immediately with that failure.
pub async fn follow_redirect(
    client: &dyn Transport,
    start_url: &str,
    policy: &RequestPolicy,
    max_depth: usize,
) -> (RequestOutcome, Vec<String>) {
    let mut chain: Vec<String> = Vec::new();
    let mut current = start_url.to_string();

    for _ in 0..max_depth {
        chain.push(current.clone());
        let outcome = do_request(client, &current, policy).await;

        let Some(response) = outcome.response.as_ref().filter(|r| r.is_redirect()) else {
            return (outcome, chain);
        };
        match next_location(response) {
            Some(next) => {
                debug!("{} redirects to {next}", response.url());
                current = next;
            }
            None => {
                warn!(
                    "Redirect status {} for {} but no Location header",
                    response.status(),
                    response.url()
                );
                return (outcome, chain);
            }
        }
    }

    debug!("Gave up on {start_url} after {max_depth} redirects");
    (RequestOutcome::failed(ErrorKind::MaxDepthReached), chain)
}

/// Resolves the redirect announced by `response`, the answer to `original_url`.
///
/// The trace's `final_url` and `tld_match` are only set when a terminal
/// response was obtained.
pub async fn handle_redirect(
    client: &dyn Transport,
    original_url: &str,
    response: &ResponseSnapshot,
    policy: &RequestPolicy,
) -> (RedirectTrace, RequestOutcome) {
    let Some(next) = next_location(response) else {
        warn!(
            "Redirect status {} for {} but no Location header",
            response.status(),
            response.url()
        );
        return (
            RedirectTrace::default(),
            RequestOutcome::from_response(response.clone()),
        );
    };

    let (outcome, chain) = follow_redirect(client, &next, policy, MAX_REDIRECT_DEPTH).await;

    let mut trace = RedirectTrace {
        chain,
        ..Default::default()
    };
    if let Some(terminal) = &outcome.response {
        trace.final_url = Some(terminal.url().to_string());
        trace.tld_match = tld_match(original_url, terminal.url(), false);
    }

    (trace, outcome)
}
