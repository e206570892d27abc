//! Parked-domain heuristic.
//!
//! Legitimate sites answer 404 on a random path; parking services answer
//! every path with a page or a redirect to a sales page.

use std::fmt::Write as _;

use log::debug;
use rand::Rng;
use reqwest::Url;

use super::request::{do_request, RequestPolicy};
use crate::client::Transport;

/// Number of random bytes in the probe path.
const RANDOM_PATH_BYTES: usize = 128;

/// Random two-segment path: 256 hex characters split in half.
fn random_path() -> String {
    let mut bytes = [0u8; RANDOM_PATH_BYTES];
    rand::rng().fill(&mut bytes[..]);

    let mut hex = String::with_capacity(RANDOM_PATH_BYTES * 2);
    for byte in bytes {
        let _ = write!(hex, "{byte:02x}");
    }
    let (first, second) = hex.split_at(RANDOM_PATH_BYTES);
    format!("/{first}/{second}")
}

/// `url` with its path replaced by `path`, query and fragment dropped.
fn with_path(url: &str, path: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_path(path);
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.into())
}

/// Whether the host of `url` serves a non-error status on a random path.
///
/// Returns `false` when the probe gets no response at all.
pub async fn is_parking_domain(client: &dyn Transport, url: &str, policy: &RequestPolicy) -> bool {
    let Some(probe_url) = with_path(url, &random_path()) else {
        debug!("Cannot build a parking probe for {url}");
        return false;
    };

    let outcome = do_request(client, &probe_url, policy).await;
    match outcome.response {
        Some(response) => {
            debug!("Parking probe on {url} answered {}", response.status());
            response.status() < 400
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{respond, MockTransport};
    use crate::error_handling::TransportError;

    fn policy() -> RequestPolicy {
        RequestPolicy {
            sleep_between_requests: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_random_path_shape() {
        let path = random_path();
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        assert_eq!(segments.len(), 2);
        assert!(segments
            .iter()
            .all(|s| s.len() == 128 && s.chars().all(|c| c.is_ascii_hexdigit())));
        assert_ne!(random_path(), path);
    }

    #[test]
    fn test_with_path_drops_query() {
        assert_eq!(
            with_path("https://a.com:8080/old?x=1#top", "/new/path").as_deref(),
            Some("https://a.com:8080/new/path")
        );
        assert_eq!(with_path("not a url", "/x"), None);
    }

    #[tokio::test]
    async fn test_catch_all_host_is_parked() {
        let mock = MockTransport::classic(|_, url| Ok(Some(respond(200, url))));
        assert!(is_parking_domain(&mock, "https://parked.com/", &policy()).await);

        let (_, probed) = &mock.calls()[0];
        assert!(probed.starts_with("https://parked.com/"));
        assert_eq!(probed.len(), "https://parked.com/".len() + 257);
    }

    #[tokio::test]
    async fn test_not_found_host_is_not_parked() {
        let mock = MockTransport::classic(|_, url| {
            if url == "https://real.com/" {
                Ok(Some(respond(200, url)))
            } else {
                Ok(Some(respond(404, url)))
            }
        });
        assert!(!is_parking_domain(&mock, "https://real.com/", &policy()).await);
    }

    #[tokio::test]
    async fn test_probe_failure_is_not_parked() {
        let mock = MockTransport::classic(|_, _| Err(TransportError::Connect("refused".into())));
        assert!(!is_parking_domain(&mock, "https://gone.com/", &policy()).await);
    }
}
