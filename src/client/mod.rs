//! Transports that perform the actual network calls.
//!
//! Two implementations share the [`Transport`] contract:
//! - [`HttpClient`]: reqwest with redirects disabled ("classic")
//! - [`BrowserClient`]: full page navigation through a [`BrowserDriver`] ("browser")
//!
//! Callers branch only on [`Transport::kind`], never on the concrete type.

mod browser;
mod http;
#[cfg(test)]
pub(crate) mod mock;
mod response;

use std::future::Future;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::error_handling::TransportError;

pub use browser::{classify_net_error, BrowserClient, BrowserDriver};
#[cfg(feature = "browser")]
pub use browser::{ChromeDriver, ChromeSettings};
pub use http::HttpClient;
pub use response::ResponseSnapshot;

/// Capability tag of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ClientKind {
    /// Plain HTTP client, eligible for the HEAD-then-GET optimization
    Classic,
    /// Headless browser, always performs a full navigation
    Browser,
}

/// Per-call request options.
///
/// Flags are OR-merged with the transport's own instance flags.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers for this call only
    pub headers: Option<HeaderMap>,
    /// Inject a `Host` header computed from the URL
    pub include_host: bool,
    /// Request body (POST)
    pub body: Option<Vec<u8>>,
    /// Retry once over `http://` after a TLS failure
    pub ssl_fallback_to_http: bool,
}

/// Result of one transport attempt.
///
/// `Ok(None)` means the attempt produced no response without failing (the
/// benign TLS want-read condition).
pub type TransportResult = Result<Option<ResponseSnapshot>, TransportError>;

/// Common surface of the classic and browser transports.
///
/// Implementors provide [`Transport::request`], a single attempt. The
/// provided `get`/`head`/`post`/`send` methods wrap it with the TLS fallback.
/// Implementations must be safe to share between concurrent probes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Capability tag used by the request executor.
    fn kind(&self) -> ClientKind;

    /// Instance-level TLS fallback flag.
    fn ssl_fallback_to_http(&self) -> bool {
        false
    }

    /// Whether scheme-less or non-http(s) URLs are sent as `https://`.
    fn ensure_protocol_url(&self) -> bool {
        false
    }

    /// Performs exactly one attempt.
    async fn request(&self, method: Method, url: &str, opts: &RequestOptions) -> TransportResult;

    /// One attempt plus the optional `http://` fallback after a TLS failure.
    async fn send(&self, method: Method, url: &str, opts: &RequestOptions) -> TransportResult {
        let fallback = opts.ssl_fallback_to_http || self.ssl_fallback_to_http();
        // The fallback target is derived from the URL actually attempted
        let url = if self.ensure_protocol_url() {
            ensure_protocol(url)
        } else {
            url.to_string()
        };
        with_ssl_fallback(&url, fallback, |target| {
            let method = method.clone();
            async move { self.request(method, &target, opts).await }
        })
        .await
    }

    /// GET request.
    async fn get(&self, url: &str, opts: &RequestOptions) -> TransportResult {
        self.send(Method::GET, url, opts).await
    }

    /// HEAD request.
    async fn head(&self, url: &str, opts: &RequestOptions) -> TransportResult {
        self.send(Method::HEAD, url, opts).await
    }

    /// POST request with a body.
    async fn post(&self, url: &str, body: Vec<u8>, opts: &RequestOptions) -> TransportResult {
        let opts = RequestOptions {
            body: Some(body),
            ..opts.clone()
        };
        self.send(Method::POST, url, &opts).await
    }

    /// Releases pooled connections or browser resources.
    ///
    /// Requests issued after `close()` fail with [`TransportError::Closed`].
    async fn close(&self) {}
}

/// Runs `send` against `url`, then once more over `http://` if the first
/// attempt failed with a TLS error and `enabled` is set.
pub(crate) async fn with_ssl_fallback<F, Fut>(url: &str, enabled: bool, mut send: F) -> TransportResult
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = TransportResult>,
{
    match send(url.to_string()).await {
        Err(error) if enabled && error.is_tls() => match downgrade_to_http(url) {
            Some(fallback) => {
                log::debug!("TLS failure on {} ({}), retrying over {}", url, error, fallback);
                send(fallback).await
            }
            None => Err(error),
        },
        other => other,
    }
}

/// `https://host/...` becomes `http://host/...`; other URLs have no fallback.
fn downgrade_to_http(url: &str) -> Option<String> {
    let scheme_end = url.find("://")?;
    if url[..scheme_end].eq_ignore_ascii_case("https") {
        Some(format!("http{}", &url[scheme_end..]))
    } else {
        None
    }
}

/// Forces `https://` on URLs with no scheme or a non-http(s) scheme.
pub fn ensure_protocol(url: &str) -> String {
    let url = url.trim();
    match url.find("://") {
        Some(idx) => {
            let scheme = &url[..idx];
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
                url.to_string()
            } else {
                format!("https{}", &url[idx..])
            }
        }
        None => format!("https://{}", url.trim_start_matches('/')),
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{respond, MockTransport};
    use super::*;

    #[test]
    fn test_client_kind_display() {
        assert_eq!(ClientKind::Classic.to_string(), "classic");
        assert_eq!(ClientKind::Browser.to_string(), "browser");
    }

    #[test]
    fn test_ensure_protocol() {
        assert_eq!(ensure_protocol("example.com"), "https://example.com");
        assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
        assert_eq!(ensure_protocol("HTTPS://example.com"), "HTTPS://example.com");
        assert_eq!(ensure_protocol("ftp://example.com/x"), "https://example.com/x");
        assert_eq!(ensure_protocol("//example.com"), "https://example.com");
    }

    #[test]
    fn test_downgrade_to_http() {
        assert_eq!(
            downgrade_to_http("https://x.com/a?b=1"),
            Some("http://x.com/a?b=1".to_string())
        );
        assert_eq!(downgrade_to_http("http://x.com"), None);
        assert_eq!(downgrade_to_http("x.com"), None);
    }

    #[tokio::test]
    async fn test_ssl_fallback_retries_over_http() {
        let mock = MockTransport::classic(|_, url| {
            if url.starts_with("https://") {
                Err(TransportError::Tls("handshake failure".into()))
            } else {
                Ok(Some(respond(200, url)))
            }
        });
        let opts = RequestOptions {
            ssl_fallback_to_http: true,
            ..Default::default()
        };

        let resp = mock.get("https://x.com", &opts).await.unwrap().unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.url(), "http://x.com");
        assert_eq!(
            mock.calls(),
            vec![
                (Method::GET, "https://x.com".to_string()),
                (Method::GET, "http://x.com".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_ssl_fallback_disabled_propagates() {
        let mock = MockTransport::classic(|_, _| Err(TransportError::Tls("bad cert".into())));
        let err = mock
            .head("https://x.com", &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_tls());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_ssl_fallback_ignores_other_errors() {
        let mock = MockTransport::classic(|_, _| Err(TransportError::Connect("refused".into())));
        let opts = RequestOptions {
            ssl_fallback_to_http: true,
            ..Default::default()
        };
        let err = mock.get("https://x.com", &opts).await.unwrap_err();
        assert_eq!(err, TransportError::Connect("refused".into()));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_instance_ssl_fallback_flag_is_merged() {
        let mock = MockTransport::classic(|_, url| {
            if url.starts_with("https://") {
                Err(TransportError::Tls("handshake failure".into()))
            } else {
                Ok(Some(respond(204, url)))
            }
        })
        .with_ssl_fallback();

        let resp = mock
            .get("https://x.com", &RequestOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_ssl_fallback_for_schemeless_url() {
        let mock = MockTransport::classic(|_, url| {
            if url.starts_with("https://") {
                Err(TransportError::Tls("handshake failure".into()))
            } else {
                Ok(Some(respond(200, url)))
            }
        })
        .with_ssl_fallback()
        .with_ensure_protocol();

        let resp = mock
            .get("example.com/a", &RequestOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.url(), "http://example.com/a");
        assert_eq!(
            mock.calls(),
            vec![
                (Method::GET, "https://example.com/a".to_string()),
                (Method::GET, "http://example.com/a".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_post_carries_body() {
        let mock = MockTransport::classic(|method, url| {
            assert_eq!(method, &Method::POST);
            Ok(Some(respond(201, url)))
        });
        let resp = mock
            .post("https://x.com/form", b"a=1".to_vec(), &RequestOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resp.status(), 201);
        assert_eq!(mock.bodies(), vec![Some(b"a=1".to_vec())]);
    }
}
