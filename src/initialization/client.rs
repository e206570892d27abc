//! HTTP client initialization.
//!
//! Builds the `reqwest::Client` behind [`crate::client::HttpClient`]:
//! redirects are never followed automatically so the redirect resolver can
//! record every hop.

use log::debug;
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{ClientBuilder, Proxy};

use crate::config::{default_headers, ClientConfig};
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for reachability checks.
///
/// Creates a `reqwest::Client` configured with:
/// - Redirect following disabled
/// - The caller's headers, or the browser-like default set built around `user_agent`
/// - Connect and read timeouts from `config`
/// - An optional proxy for every scheme
/// - Rustls TLS backend (no native TLS)
///
/// # Arguments
///
/// * `config` - Transport settings
/// * `user_agent` - User-Agent used when the header set does not carry one
///
/// # Errors
///
/// Returns `InitializationError::ProxyError` if the proxy URL is rejected, or
/// `InitializationError::HttpClientError` if the client cannot be built.
pub fn init_client(
    config: &ClientConfig,
    user_agent: &str,
) -> Result<reqwest::Client, InitializationError> {
    let mut headers = match &config.headers {
        Some(headers) => headers.clone(),
        None => default_headers(user_agent),
    };
    if !headers.contains_key(USER_AGENT) {
        if let Ok(value) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, value);
        }
    }

    let mut builder = ClientBuilder::new()
        .redirect(Policy::none())
        .default_headers(headers)
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .use_rustls_tls();

    if let Some(proxy_url) = &config.proxy {
        let proxy = Proxy::all(proxy_url).map_err(|e| InitializationError::ProxyError {
            url: proxy_url.clone(),
            reason: e.to_string(),
        })?;
        debug!("Routing requests through proxy {proxy_url}");
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_with_defaults() {
        crate::initialization::init_crypto_provider();
        assert!(init_client(&ClientConfig::default(), "test-agent/1.0").is_ok());
    }

    #[test]
    fn test_init_client_with_proxy() {
        crate::initialization::init_crypto_provider();
        let config = ClientConfig {
            proxy: Some("http://127.0.0.1:3128".to_string()),
            ..Default::default()
        };
        assert!(init_client(&config, "test-agent/1.0").is_ok());
    }

    #[test]
    fn test_init_client_rejects_bad_proxy() {
        crate::initialization::init_crypto_provider();
        let config = ClientConfig {
            proxy: Some("::not a proxy::".to_string()),
            ..Default::default()
        };
        match init_client(&config, "test-agent/1.0") {
            Err(InitializationError::ProxyError { url, .. }) => assert_eq!(url, "::not a proxy::"),
            other => panic!("expected ProxyError, got {other:?}"),
        }
    }
}
