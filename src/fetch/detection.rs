//! Body and header heuristics.
//!
//! Both checks are literal substring matches. They miss many cases (a JS
//! redirect can be written in countless ways) and are kept deliberately coarse.

use crate::client::ResponseSnapshot;
use crate::config::{CLOUDFLARE_BODY_MARKER, CLOUDFLARE_RAY_HEADER, JS_REDIRECT_MARKERS};

/// Cloudflare analytics beacon in the body, or a `cf-ray` header.
pub fn is_cloudflare_protected(response: &ResponseSnapshot) -> bool {
    response.body_contains(CLOUDFLARE_BODY_MARKER)
        || response.headers().contains_key(CLOUDFLARE_RAY_HEADER)
}

/// Body contains every JS redirect marker.
pub fn has_js_redirect(response: &ResponseSnapshot) -> bool {
    JS_REDIRECT_MARKERS
        .iter()
        .all(|marker| response.body_contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{respond, respond_body, respond_headers};

    #[test]
    fn test_cloudflare_body_marker() {
        let resp = respond_body(
            200,
            "https://a.com/",
            r#"<script defer src="https://static.cloudflareinsights.com/beacon.min.js"></script>"#,
        );
        assert!(is_cloudflare_protected(&resp));
    }

    #[test]
    fn test_cloudflare_ray_header() {
        let resp = respond_headers(403, "https://a.com/", &[("CF-RAY", "8a1b2c3d4e5f-AMS")]);
        assert!(is_cloudflare_protected(&resp));
        assert!(!is_cloudflare_protected(&respond(200, "https://a.com/")));
    }

    #[test]
    fn test_js_redirect_needs_both_markers() {
        let both = respond_body(
            200,
            "https://a.com/",
            "document.addEventListener('DOMContentLoaded', () => { window.location.href = '/x'; });",
        );
        assert!(has_js_redirect(&both));

        let one = respond_body(200, "https://a.com/", "window.location.href = '/x';");
        assert!(!has_js_redirect(&one));
        assert!(!has_js_redirect(&respond(200, "https://a.com/")));
    }
}
