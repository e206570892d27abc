//! Error categorization and retry strategy.
//!
//! This module maps `reqwest` failures onto [`TransportError`] and configures
//! the backoff used when a transport opts into read-timeout retries.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::TransportError;
use crate::config::{RETRY_BASE_DELAY_MS, RETRY_FACTOR, RETRY_MAX_DELAY_SECS};

/// Substrings (lowercase) that identify a TLS failure in an error chain.
const TLS_PATTERNS: &[&str] = &[
    "certificate",
    "handshake",
    "tls",
    "ssl",
    "corrupt message",
    "invalidcontenttype",
    "unknownissuer",
];

/// Substrings (lowercase) that identify a malformed server answer.
const PROTOCOL_PATTERNS: &[&str] = &[
    "invalid http",
    "invalid status",
    "invalid header",
    "incomplete message",
    "connection closed before message completed",
    "parse error",
    "http2 error",
    "h2 protocol error",
];

/// Creates an exponential backoff retry strategy.
///
/// Delays start at 500ms and double up to `RETRY_MAX_DELAY_SECS`. The
/// iterator yields `retries` delays, i.e. `retries` extra attempts.
pub fn get_retry_strategy(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(RETRY_BASE_DELAY_MS)
        .factor(RETRY_FACTOR)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(retries)
}

fn sources<'a>(error: &'a reqwest::Error) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(error.source(), |cause| (*cause).source())
}

/// Lowercased messages of every cause below the top-level error.
///
/// The top-level reqwest message embeds the URL, which must not feed the
/// pattern matching (a host named `ssl.example.com` is not a TLS failure).
fn cause_text(error: &reqwest::Error) -> String {
    sources(error)
        .map(|cause| cause.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(": ")
}

fn has_io_kind(error: &reqwest::Error, kinds: &[io::ErrorKind]) -> bool {
    sources(error).any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| kinds.contains(&io_err.kind()))
    })
}

fn has_rustls_error(error: &reqwest::Error) -> bool {
    sources(error).any(|cause| {
        if cause.downcast_ref::<rustls::Error>().is_some() {
            return true;
        }
        cause
            .downcast_ref::<io::Error>()
            .and_then(|io_err| io_err.get_ref())
            .is_some_and(|inner| inner.downcast_ref::<rustls::Error>().is_some())
    })
}

/// Whether the failure is the non-blocking TLS "want read" condition.
///
/// Surfaces as `WouldBlock` while rustls is still buffering a record. It is
/// not a request failure; the attempt simply produced no response.
pub fn is_tls_want_read(error: &reqwest::Error) -> bool {
    has_io_kind(error, &[io::ErrorKind::WouldBlock])
}

/// Categorizes a `reqwest::Error` into a [`TransportError`].
///
/// Order matters: TLS failures also report `is_connect()`, and connect
/// timeouts report both `is_connect()` and `is_timeout()`.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportError {
    let detail = cause_text(error);
    let message = if detail.is_empty() {
        error.to_string()
    } else {
        detail.clone()
    };

    if has_rustls_error(error) || TLS_PATTERNS.iter().any(|p| detail.contains(p)) {
        return TransportError::Tls(message);
    }

    if error.is_timeout() {
        return if error.is_connect() {
            TransportError::ConnectTimeout(message)
        } else {
            TransportError::ReadTimeout(message)
        };
    }

    if error.is_connect() {
        return TransportError::Connect(message);
    }

    if has_io_kind(
        error,
        &[
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::BrokenPipe,
        ],
    ) {
        return TransportError::Read(message);
    }

    if PROTOCOL_PATTERNS.iter().any(|p| detail.contains(p)) {
        return TransportError::Protocol(message);
    }

    if error.is_body() {
        return TransportError::Read(message);
    }

    let name = if error.is_decode() {
        "DecodeError"
    } else if error.is_builder() {
        "BuilderError"
    } else if error.is_redirect() {
        "RedirectError"
    } else {
        "RequestError"
    };
    TransportError::Other {
        name: name.to_string(),
        message,
    }
}
