//! Per-URL pipeline: request, redirects, classification.

use log::debug;
use reqwest::Url;

use crate::client::{ensure_protocol, ClientKind, Transport};
use crate::fetch::{
    do_request, handle_redirect, has_js_redirect, is_cloudflare_protected, is_parking_domain,
    RedirectTrace, RequestPolicy,
};
use crate::models::ReachabilityResult;

/// Everything a probe needs besides the transport.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSettings {
    pub policy: RequestPolicy,
    pub include_response: bool,
    pub check_parking_domain: bool,
}

/// Probes `url` and builds its result. Never fails: network trouble ends up
/// in `error_kind`.
pub(crate) async fn probe(client: &dyn Transport, url: &str, settings: &ProbeSettings) -> ReachabilityResult {
    let mut result = ReachabilityResult::new(url);
    let mut outcome = do_request(client, url, &settings.policy).await;

    // A browser follows redirects on its own, only the URL change is visible
    if client.kind() == ClientKind::Browser {
        if let Some(response) = outcome.response.as_ref().filter(|r| !r.is_redirect()) {
            if !response.url().is_empty() && !same_url(url, response.url()) {
                debug!("Browser navigation moved {url} to {}", response.url());
                result.redirect = Some(RedirectTrace::synthesized(url, response.url()));
                result.final_url = Some(response.url().to_string());
            }
        }
    }

    if let Some(first) = outcome.response.clone().filter(|r| r.is_redirect()) {
        let (trace, terminal) = handle_redirect(client, url, &first, &settings.policy).await;
        if !trace.chain.is_empty() {
            result.final_url = trace.final_url.clone();
            result.redirect = Some(trace);
        }
        outcome = terminal;
    }

    result.error_kind = outcome.error.clone();
    if let Some(response) = &outcome.response {
        result.status_code = i32::from(response.status());
        result.success = response.is_success();
        result.cloudflare_protection = is_cloudflare_protected(response);
        result.has_js_redirect = has_js_redirect(response);

        if settings.check_parking_domain {
            let parked = is_parking_domain(client, response.url(), &settings.policy).await;
            result.is_parking_domain = Some(parked);
        }
    }

    if settings.include_response {
        result.response = outcome.response;
    }

    debug!(
        "{url}: status {} success {} error {:?}",
        result.status_code, result.success, result.error_kind
    );
    result
}

/// Whether the browser landed on the URL it was asked for, tolerating
/// normalization (`a.com` vs `https://a.com/`). The browser transport always
/// navigates to the `https://` form of a scheme-less URL.
fn same_url(requested: &str, landed: &str) -> bool {
    let requested = ensure_protocol(requested);
    match (Url::parse(&requested), Url::parse(landed)) {
        (Ok(a), Ok(b)) => a == b,
        _ => requested == landed,
    }
}
