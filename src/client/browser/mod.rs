//! Browser transport.
//!
//! [`BrowserClient`] adapts any [`BrowserDriver`] (a real headless Chrome via
//! [`ChromeDriver`] when the `browser` feature is on) to the [`Transport`]
//! contract. Every request is a full page navigation: redirects are followed
//! by the browser itself and the snapshot carries the post-navigation URL.

#[cfg(feature = "browser")]
mod chrome;

use async_trait::async_trait;
use log::warn;
use reqwest::Method;

use super::{ensure_protocol, ClientKind, RequestOptions, ResponseSnapshot, Transport, TransportResult};
use crate::error_handling::TransportError;

#[cfg(feature = "browser")]
pub use chrome::{ChromeDriver, ChromeSettings};

/// Something that can load a page and report the main document response.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigates to `url` and waits for the page to settle.
    async fn navigate(&self, url: &str) -> Result<ResponseSnapshot, TransportError>;

    /// Releases the browser. Later navigations must fail with `Closed`.
    async fn shutdown(&self) {}
}

/// Transport that drives a browser.
pub struct BrowserClient<D> {
    driver: D,
    ssl_fallback_to_http: bool,
}

impl<D: BrowserDriver> BrowserClient<D> {
    /// Wraps a driver.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            ssl_fallback_to_http: false,
        }
    }

    /// Enables the `http://` retry after TLS failures for every call.
    pub fn with_ssl_fallback(mut self, enabled: bool) -> Self {
        self.ssl_fallback_to_http = enabled;
        self
    }
}

#[async_trait]
impl<D: BrowserDriver> Transport for BrowserClient<D> {
    fn kind(&self) -> ClientKind {
        ClientKind::Browser
    }

    fn ssl_fallback_to_http(&self) -> bool {
        self.ssl_fallback_to_http
    }

    async fn request(&self, method: Method, url: &str, opts: &RequestOptions) -> TransportResult {
        if method != Method::GET {
            warn!("Browser transport cannot send {method}, navigating to {url} instead");
        }
        if opts.headers.is_some() || opts.body.is_some() {
            warn!("Browser transport ignores per-request headers and bodies");
        }
        self.driver.navigate(&ensure_protocol(url)).await.map(Some)
    }

    async fn close(&self) {
        self.driver.shutdown().await;
    }
}

/// Maps a Chrome network error string (`net::ERR_*`) onto the transport
/// error taxonomy.
pub fn classify_net_error(message: &str) -> TransportError {
    let upper = message.to_ascii_uppercase();
    let has = |code: &str| upper.contains(code);
    let text = message.to_string();

    if has("ERR_NAME_NOT_RESOLVED")
        || has("ERR_CONNECTION_REFUSED")
        || has("ERR_ADDRESS_UNREACHABLE")
        || has("ERR_INTERNET_DISCONNECTED")
        || has("ERR_CONNECTION_FAILED")
    {
        TransportError::Connect(text)
    } else if has("ERR_CONNECTION_TIMED_OUT") {
        TransportError::ConnectTimeout(text)
    } else if has("ERR_TIMED_OUT") || has("TIMED OUT") || has("TIMEOUT") {
        TransportError::ReadTimeout(text)
    } else if has("ERR_CERT_") || has("ERR_SSL_") {
        TransportError::Tls(text)
    } else if has("ERR_CONNECTION_RESET")
        || has("ERR_CONNECTION_CLOSED")
        || has("ERR_EMPTY_RESPONSE")
    {
        TransportError::Read(text)
    } else if has("ERR_INVALID_RESPONSE")
        || has("ERR_INVALID_HTTP_RESPONSE")
        || has("ERR_HTTP2_PROTOCOL_ERROR")
    {
        TransportError::Protocol(text)
    } else {
        TransportError::Other {
            name: "BrowserError".to_string(),
            message: text,
        }
    }
}
