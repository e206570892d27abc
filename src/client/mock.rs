// Scripted transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use super::{ClientKind, RequestOptions, ResponseSnapshot, Transport, TransportResult};

type Handler = dyn Fn(&Method, &str) -> TransportResult + Send + Sync;

/// Transport whose responses come from a closure, recording every call.
pub(crate) struct MockTransport {
    kind: ClientKind,
    ssl_fallback: bool,
    ensure_protocol: bool,
    handler: Box<Handler>,
    calls: Mutex<Vec<(Method, String)>>,
    bodies: Mutex<Vec<Option<Vec<u8>>>>,
    closed: Mutex<bool>,
}

impl MockTransport {
    pub(crate) fn new<F>(kind: ClientKind, handler: F) -> Self
    where
        F: Fn(&Method, &str) -> TransportResult + Send + Sync + 'static,
    {
        Self {
            kind,
            ssl_fallback: false,
            ensure_protocol: false,
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
            closed: Mutex::new(false),
        }
    }

    pub(crate) fn classic<F>(handler: F) -> Self
    where
        F: Fn(&Method, &str) -> TransportResult + Send + Sync + 'static,
    {
        Self::new(ClientKind::Classic, handler)
    }

    pub(crate) fn browser<F>(handler: F) -> Self
    where
        F: Fn(&Method, &str) -> TransportResult + Send + Sync + 'static,
    {
        Self::new(ClientKind::Browser, handler)
    }

    pub(crate) fn with_ssl_fallback(mut self) -> Self {
        self.ssl_fallback = true;
        self
    }

    pub(crate) fn with_ensure_protocol(mut self) -> Self {
        self.ensure_protocol = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn bodies(&self) -> Vec<Option<Vec<u8>>> {
        self.bodies.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn kind(&self) -> ClientKind {
        self.kind
    }

    fn ssl_fallback_to_http(&self) -> bool {
        self.ssl_fallback
    }

    fn ensure_protocol_url(&self) -> bool {
        self.ensure_protocol
    }

    async fn request(&self, method: Method, url: &str, opts: &RequestOptions) -> TransportResult {
        self.calls.lock().unwrap().push((method.clone(), url.to_string()));
        self.bodies.lock().unwrap().push(opts.body.clone());
        (self.handler)(&method, url)
    }

    async fn close(&self) {
        *self.closed.lock().unwrap() = true;
    }
}

/// Empty-bodied response with the given status, served from `url`.
pub(crate) fn respond(status: u16, url: &str) -> ResponseSnapshot {
    ResponseSnapshot::new(status, HeaderMap::new(), Vec::new(), url)
}

/// Response with a body.
pub(crate) fn respond_body(status: u16, url: &str, body: &str) -> ResponseSnapshot {
    ResponseSnapshot::new(status, HeaderMap::new(), body.as_bytes().to_vec(), url)
}

/// Response with headers.
pub(crate) fn respond_headers(status: u16, url: &str, headers: &[(&str, &str)]) -> ResponseSnapshot {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    ResponseSnapshot::new(status, map, Vec::new(), url)
}

/// 3xx response pointing at `location`.
pub(crate) fn redirect(status: u16, url: &str, location: &str) -> ResponseSnapshot {
    respond_headers(status, url, &[("location", location)])
}
