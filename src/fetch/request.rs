//! Request executor: the HEAD-then-GET policy.

use std::time::Duration;

use log::debug;
use rand::Rng;
use reqwest::Method;
use serde::Serialize;

use crate::client::{ClientKind, RequestOptions, ResponseSnapshot, Transport};
use crate::config::{JITTER_MAX, JITTER_MIN};
use crate::error_handling::ErrorKind;

/// How a logical "check this URL" request is turned into transport calls.
#[derive(Debug, Clone)]
pub struct RequestPolicy {
    /// Try HEAD first on classic transports
    pub head_optim: bool,
    /// Sleep a random jitter before every network attempt
    pub sleep_between_requests: bool,
    /// Lower jitter bound
    pub jitter_min: Duration,
    /// Upper jitter bound
    pub jitter_max: Duration,
    /// Options forwarded to every transport call
    pub options: RequestOptions,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            head_optim: true,
            sleep_between_requests: true,
            jitter_min: JITTER_MIN,
            jitter_max: JITTER_MAX,
            options: RequestOptions::default(),
        }
    }
}

impl RequestPolicy {
    /// Waits a random duration in `[jitter_min, jitter_max]` when sleeping is on.
    pub async fn pause(&self) {
        if !self.sleep_between_requests {
            return;
        }
        let delay = self.jitter();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn jitter(&self) -> Duration {
        let (low, high) = if self.jitter_min <= self.jitter_max {
            (self.jitter_min, self.jitter_max)
        } else {
            (self.jitter_max, self.jitter_min)
        };
        let millis = rand::rng().random_range(low.as_millis()..=high.as_millis());
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

/// Response or error of one logical request.
///
/// At most one side is populated. Both are empty only when the transport
/// returned no response without failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestOutcome {
    /// Last response obtained at the transport level (any status)
    pub response: Option<ResponseSnapshot>,
    /// Why no response was obtained
    pub error: Option<ErrorKind>,
}

impl RequestOutcome {
    /// Outcome carrying a response.
    pub fn from_response(response: ResponseSnapshot) -> Self {
        Self {
            response: Some(response),
            error: None,
        }
    }

    /// Outcome carrying an error.
    pub fn failed(error: ErrorKind) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }

    /// Whether the response is a 3xx.
    pub fn is_redirect(&self) -> bool {
        self.response.as_ref().is_some_and(ResponseSnapshot::is_redirect)
    }
}

/// Executes one logical request against `url`.
///
/// Issues HEAD when `policy.head_optim` is set and the transport is classic,
/// GET otherwise. A HEAD answered with a status >= 400 is discarded and
/// replayed as GET, since many servers reject HEAD but serve GET.
///
/// Transport failures never escape: they become `RequestOutcome::error`.
pub async fn do_request(client: &dyn Transport, url: &str, policy: &RequestPolicy) -> RequestOutcome {
    policy.pause().await;

    let use_head = policy.head_optim && client.kind() == ClientKind::Classic;
    let method = if use_head { Method::HEAD } else { Method::GET };
    let outcome = attempt(client, method, url, policy).await;

    if use_head {
        if let Some(status) = outcome.response.as_ref().map(ResponseSnapshot::status) {
            if status >= 400 {
                debug!("HEAD {url} answered {status}, retrying with GET");
                policy.pause().await;
                return attempt(client, Method::GET, url, policy).await;
            }
        }
    }

    outcome
}

async fn attempt(client: &dyn Transport, method: Method, url: &str, policy: &RequestPolicy) -> RequestOutcome {
    debug!("{method} {url} ({} transport)", client.kind());
    match client.send(method, url, &policy.options).await {
        Ok(Some(response)) => RequestOutcome::from_response(response),
        Ok(None) => RequestOutcome::default(),
        Err(error) => {
            debug!("Request to {url} failed: {error}");
            RequestOutcome::failed(error.kind())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{respond, MockTransport};
    use crate::error_handling::TransportError;

    fn no_sleep() -> RequestPolicy {
        RequestPolicy {
            sleep_between_requests: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_head_then_get_on_misfire() {
        let mock = MockTransport::classic(|method, url| {
            let status = if method == Method::HEAD { 403 } else { 200 };
            Ok(Some(respond(status, url)))
        });

        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert_eq!(outcome.response.unwrap().status(), 200);
        assert!(outcome.error.is_none());
        assert_eq!(
            mock.calls(),
            vec![
                (Method::HEAD, "https://x.com".to_string()),
                (Method::GET, "https://x.com".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_head_success_is_kept() {
        let mock = MockTransport::classic(|_, url| Ok(Some(respond(200, url))));
        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert_eq!(outcome.response.unwrap().status(), 200);
        assert_eq!(mock.calls(), vec![(Method::HEAD, "https://x.com".to_string())]);
    }

    #[tokio::test]
    async fn test_get_error_status_is_not_retried() {
        let mock = MockTransport::classic(|_, url| Ok(Some(respond(404, url))));
        let policy = RequestPolicy {
            head_optim: false,
            ..no_sleep()
        };
        let outcome = do_request(&mock, "https://x.com", &policy).await;
        assert_eq!(outcome.response.unwrap().status(), 404);
        assert_eq!(mock.calls(), vec![(Method::GET, "https://x.com".to_string())]);
    }

    #[tokio::test]
    async fn test_browser_never_uses_head() {
        let mock = MockTransport::browser(|_, url| Ok(Some(respond(500, url))));
        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert_eq!(outcome.response.unwrap().status(), 500);
        assert_eq!(mock.calls(), vec![(Method::GET, "https://x.com".to_string())]);
    }

    #[tokio::test]
    async fn test_transport_error_becomes_kind() {
        let mock = MockTransport::classic(|_, _| Err(TransportError::ConnectTimeout("slow".into())));
        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert!(outcome.response.is_none());
        assert_eq!(outcome.error, Some(ErrorKind::ConnectTimeout));
    }

    #[tokio::test]
    async fn test_head_error_is_not_replayed() {
        let mock = MockTransport::classic(|_, _| Err(TransportError::Read("reset".into())));
        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert_eq!(outcome.error, Some(ErrorKind::ReadError));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_no_response_is_empty_outcome() {
        let mock = MockTransport::classic(|_, _| Ok(None));
        let outcome = do_request(&mock, "https://x.com", &no_sleep()).await;
        assert_eq!(outcome, RequestOutcome::default());
    }

    #[test]
    fn test_jitter_within_bounds() {
        let policy = RequestPolicy {
            jitter_min: Duration::from_millis(5),
            jitter_max: Duration::from_millis(10),
            ..Default::default()
        };
        for _ in 0..50 {
            let delay = policy.jitter();
            assert!(delay >= Duration::from_millis(5) && delay <= Duration::from_millis(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_when_enabled() {
        let policy = RequestPolicy::default();
        let start = tokio::time::Instant::now();
        policy.pause().await;
        assert!(start.elapsed() >= JITTER_MIN);
    }
}
