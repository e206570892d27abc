//! Reachability orchestration.
//!
//! Entry points:
//! - [`is_reachable`] probes URLs one after another
//! - [`is_reachable_concurrent`] probes them through a bounded [`TaskPool`]
//! - [`is_reachable_blocking`] wraps [`is_reachable`] in its own runtime
//!
//! All three dedupe the input, never fail because of network trouble, and
//! return a result shaped like the input.

mod pool;
mod probe;

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::client::{HttpClient, RequestOptions, Transport};
use crate::config::ClientConfig;
use crate::error_handling::{ErrorKind, ReachableError};
use crate::fetch::RequestPolicy;
use crate::models::{Reachability, ReachabilityResult, UrlInput};

pub use pool::TaskPool;
use probe::{probe, ProbeSettings};

/// Settings of one `is_reachable*` call.
#[derive(Clone)]
pub struct ReachabilityOptions {
    /// Replaces the default header set
    pub headers: Option<HeaderMap>,
    /// Send a `Host` header derived from each URL
    pub include_host: bool,
    /// Random 1-2s pause before every network attempt
    pub sleep_between_requests: bool,
    /// Try HEAD before GET on classic transports
    pub head_optim: bool,
    /// Keep the terminal response in each result
    pub include_response: bool,
    /// Caller-owned transport. Never closed by the orchestrator; when absent
    /// a short-lived [`HttpClient`] is created and closed for the call.
    pub client: Option<Arc<dyn Transport>>,
    /// Retry over `http://` after TLS failures
    pub ssl_fallback_to_http: bool,
    /// Probe a random path to detect parked domains
    pub check_parking_domain: bool,
    /// Settings for the orchestrator-owned client
    pub client_config: ClientConfig,
    /// Stops admitting and running probes once cancelled
    pub cancellation: CancellationToken,
}

impl Default for ReachabilityOptions {
    fn default() -> Self {
        Self {
            headers: None,
            include_host: true,
            sleep_between_requests: true,
            head_optim: true,
            include_response: false,
            client: None,
            ssl_fallback_to_http: false,
            check_parking_domain: false,
            client_config: ClientConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }
}

impl fmt::Debug for ReachabilityOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReachabilityOptions")
            .field("headers", &self.headers)
            .field("include_host", &self.include_host)
            .field("sleep_between_requests", &self.sleep_between_requests)
            .field("head_optim", &self.head_optim)
            .field("include_response", &self.include_response)
            .field("client", &self.client.as_ref().map(|c| c.kind()))
            .field("ssl_fallback_to_http", &self.ssl_fallback_to_http)
            .field("check_parking_domain", &self.check_parking_domain)
            .field("client_config", &self.client_config)
            .finish()
    }
}

impl ReachabilityOptions {
    /// The transport to use and whether this call owns it.
    fn resolve_client(&self) -> Result<(Arc<dyn Transport>, bool), ReachableError> {
        if let Some(client) = &self.client {
            return Ok((Arc::clone(client), false));
        }

        let mut config = self.client_config.clone();
        if self.headers.is_some() {
            config.headers = self.headers.clone();
        }
        config.include_host = self.include_host;
        config.ssl_fallback_to_http |= self.ssl_fallback_to_http;
        let client: Arc<dyn Transport> = Arc::new(HttpClient::new(&config)?);
        Ok((client, true))
    }

    fn probe_settings(&self, owns_client: bool) -> ProbeSettings {
        ProbeSettings {
            policy: RequestPolicy {
                head_optim: self.head_optim,
                sleep_between_requests: self.sleep_between_requests,
                options: RequestOptions {
                    // An owned client already carries the headers as defaults
                    headers: if owns_client { None } else { self.headers.clone() },
                    include_host: self.include_host,
                    body: None,
                    ssl_fallback_to_http: self.ssl_fallback_to_http,
                },
                ..RequestPolicy::default()
            },
            include_response: self.include_response,
            check_parking_domain: self.check_parking_domain,
        }
    }
}

/// Probes every distinct URL of `input`, one at a time.
///
/// Results follow the order of first occurrence in the input. A single URL
/// yields [`Reachability::Single`], a batch [`Reachability::Many`].
///
/// # Errors
///
/// Only fails if no client was supplied and the default one cannot be built.
pub async fn is_reachable(
    input: impl Into<UrlInput>,
    options: &ReachabilityOptions,
) -> Result<Reachability, ReachableError> {
    let input = input.into();
    let urls = input.unique_urls();
    let (client, owns_client) = options.resolve_client()?;
    let settings = options.probe_settings(owns_client);
    debug!("Checking {} URL(s) sequentially", urls.len());

    let mut results = Vec::with_capacity(urls.len());
    for url in &urls {
        let result = tokio::select! {
            biased;
            _ = options.cancellation.cancelled() => None,
            result = probe(client.as_ref(), url, &settings) => Some(result),
        };
        match result {
            Some(result) => results.push(result),
            None => {
                info!("Cancelled, {} URL(s) left unchecked", urls.len() - results.len());
                break;
            }
        }
    }

    if owns_client {
        client.close().await;
    }
    Ok(shape(&input, results))
}

/// Probes every distinct URL of `input` with at most `workers` in flight.
///
/// Results arrive in completion order. Probes cancelled through
/// `options.cancellation` are left out.
///
/// # Errors
///
/// Same as [`is_reachable`].
pub async fn is_reachable_concurrent(
    input: impl Into<UrlInput>,
    options: &ReachabilityOptions,
    workers: usize,
) -> Result<Reachability, ReachableError> {
    let input = input.into();
    let urls = input.unique_urls();
    let (client, owns_client) = options.resolve_client()?;
    let settings = Arc::new(options.probe_settings(owns_client));
    debug!("Checking {} URL(s) with {workers} workers", urls.len());

    let mut pool = TaskPool::with_cancellation(workers, options.cancellation.clone());
    for url in urls {
        let client = Arc::clone(&client);
        let settings = Arc::clone(&settings);
        let started = pool
            .put(async move { probe(client.as_ref(), &url, &settings).await })
            .await;
        if !started {
            info!("Cancelled, no more URLs admitted");
            break;
        }
    }
    let results = pool.join().await;

    if owns_client {
        client.close().await;
    }
    Ok(shape(&input, results))
}

/// Blocking variant of [`is_reachable`] on a private current-thread runtime.
///
/// Must not be called from within a Tokio runtime.
///
/// # Errors
///
/// Same as [`is_reachable`], plus [`ReachableError::Runtime`] if the
/// runtime cannot be created.
pub fn is_reachable_blocking(
    input: impl Into<UrlInput>,
    options: &ReachabilityOptions,
) -> Result<Reachability, ReachableError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(is_reachable(input, options))
}

fn shape(input: &UrlInput, mut results: Vec<ReachabilityResult>) -> Reachability {
    match input {
        UrlInput::Single(url) => Reachability::Single(results.pop().unwrap_or_else(|| {
            let mut cancelled = ReachabilityResult::new(url.as_str());
            cancelled.error_kind = Some(ErrorKind::Other("Cancelled".to_string()));
            cancelled
        })),
        UrlInput::Many(_) => Reachability::Many(results),
    }
}
