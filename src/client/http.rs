//! Classic HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use log::debug;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, HOST};
use reqwest::Method;
use tokio::sync::RwLock;
use tokio_retry::RetryIf;

use super::{ensure_protocol, ClientKind, RequestOptions, ResponseSnapshot, Transport, TransportResult};
use crate::config::{ClientConfig, MAX_RESPONSE_BODY_SIZE};
use crate::domain::DomainParts;
use crate::error_handling::{
    categorize_reqwest_error, get_retry_strategy, is_tls_want_read, InitializationError,
    TransportError,
};
use crate::initialization::init_client;
use crate::user_agent::UserAgentPool;

/// Plain HTTP client with automatic redirect following disabled.
///
/// The underlying `reqwest::Client` is pooled and cheap to share; `close()`
/// drops it, after which every request fails with [`TransportError::Closed`].
pub struct HttpClient {
    inner: RwLock<Option<reqwest::Client>>,
    include_host: bool,
    ssl_fallback_to_http: bool,
    ensure_protocol_url: bool,
    read_timeout_retries: usize,
}

impl HttpClient {
    /// Builds a client, picking a User-Agent from the default pool unless
    /// `config.user_agent` is set.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError` if the proxy URL is invalid or the
    /// TLS backend cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self, InitializationError> {
        Self::with_user_agents(config, &UserAgentPool::default(), &mut rand::rng())
    }

    /// Like [`HttpClient::new`] with an explicit pool and random source.
    pub fn with_user_agents<R: Rng + ?Sized>(
        config: &ClientConfig,
        pool: &UserAgentPool,
        rng: &mut R,
    ) -> Result<Self, InitializationError> {
        let user_agent = match &config.user_agent {
            Some(ua) => ua.clone(),
            None => pool.sample(rng).to_string(),
        };
        let client = init_client(config, &user_agent)?;
        debug!("HTTP client ready (user agent: {user_agent})");

        Ok(Self {
            inner: RwLock::new(Some(client)),
            include_host: config.include_host,
            ssl_fallback_to_http: config.ssl_fallback_to_http,
            ensure_protocol_url: config.ensure_protocol_url,
            read_timeout_retries: config.read_timeout_retries,
        })
    }

    /// Whether `close()` has been called.
    pub async fn is_closed(&self) -> bool {
        self.inner.read().await.is_none()
    }

    fn request_headers(&self, url: &str, opts: &RequestOptions) -> HeaderMap {
        let mut headers = opts.headers.clone().unwrap_or_default();
        if self.include_host || opts.include_host {
            let fqdn = DomainParts::parse(url).fqdn();
            if let Ok(value) = HeaderValue::from_str(&fqdn) {
                if !fqdn.is_empty() {
                    headers.entry(HOST).or_insert(value);
                }
            }
        }
        headers
    }
}

#[async_trait]
impl Transport for HttpClient {
    fn kind(&self) -> ClientKind {
        ClientKind::Classic
    }

    fn ssl_fallback_to_http(&self) -> bool {
        self.ssl_fallback_to_http
    }

    fn ensure_protocol_url(&self) -> bool {
        self.ensure_protocol_url
    }

    async fn request(&self, method: Method, url: &str, opts: &RequestOptions) -> TransportResult {
        let client = match self.inner.read().await.as_ref() {
            Some(client) => client.clone(),
            None => return Err(TransportError::Closed),
        };

        let url = if self.ensure_protocol_url {
            ensure_protocol(url)
        } else {
            url.to_string()
        };
        let headers = self.request_headers(&url, opts);

        // Only read timeouts are retried; everything else surfaces immediately
        RetryIf::spawn(
            get_retry_strategy(self.read_timeout_retries),
            || execute(&client, method.clone(), &url, headers.clone(), opts.body.clone()),
            |error: &TransportError| {
                let retry = error.is_retriable();
                if retry {
                    debug!("Retrying {url} after {error}");
                }
                retry
            },
        )
        .await
    }

    async fn close(&self) {
        if self.inner.write().await.take().is_some() {
            debug!("HTTP client closed");
        }
    }
}

async fn execute(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
) -> TransportResult {
    let is_head = method == Method::HEAD;
    let mut builder = client.request(method, url).headers(headers);
    if let Some(body) = body {
        builder = builder.body(body);
    }

    let mut response = match builder.send().await {
        Ok(response) => response,
        Err(e) if is_tls_want_read(&e) => {
            debug!("TLS want-read on {url}, no response");
            return Ok(None);
        }
        Err(e) => return Err(categorize_reqwest_error(&e)),
    };

    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let final_url = response.url().to_string();
    let body = if is_head {
        Vec::new()
    } else {
        read_capped_body(&mut response).await?
    };

    Ok(Some(ResponseSnapshot::new(status, headers, body, final_url)))
}

/// Reads at most `MAX_RESPONSE_BODY_SIZE` bytes, discarding the rest.
async fn read_capped_body(response: &mut reqwest::Response) -> Result<Vec<u8>, TransportError> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| categorize_reqwest_error(&e))?
    {
        let remaining = MAX_RESPONSE_BODY_SIZE - body.len();
        if chunk.len() >= remaining {
            body.extend_from_slice(&chunk[..remaining]);
            debug!("Truncated body of {} at {} bytes", response.url(), MAX_RESPONSE_BODY_SIZE);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
