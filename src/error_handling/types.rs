//! Error type definitions.
//!
//! Network outcomes are data (`ErrorKind`, carried in results). Only
//! initialization problems and malformed input are returned as errors.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use serde::{Serialize, Serializer};
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The proxy URL could not be used.
    #[error("Invalid proxy '{url}': {reason}")]
    ProxyError {
        /// Proxy URL as given
        url: String,
        /// Underlying reason
        reason: String,
    },

    /// The headless browser could not be started.
    #[error("Browser launch error: {0}")]
    BrowserLaunchError(String),
}

/// Errors surfaced by the public `is_reachable*` entry points.
#[derive(Error, Debug)]
pub enum ReachableError {
    /// Input was neither a URL string nor a collection of URL strings.
    #[error("URL(s) of type {0} is not supported")]
    InvalidInput(String),

    /// The orchestrator could not create its own client.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The blocking entry point could not start a runtime.
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Failure of a single transport attempt.
///
/// Every variant maps to an [`ErrorKind`] through [`TransportError::kind`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused or DNS resolution failure.
    #[error("connection error: {0}")]
    Connect(String),

    /// TCP/TLS connect phase exceeded its timeout.
    #[error("connect timeout: {0}")]
    ConnectTimeout(String),

    /// Response read phase exceeded its timeout.
    #[error("read timeout: {0}")]
    ReadTimeout(String),

    /// Malformed or unexpected protocol response.
    #[error("remote protocol error: {0}")]
    Protocol(String),

    /// TLS handshake or certificate failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection reset while reading.
    #[error("read error: {0}")]
    Read(String),

    /// The client was used after `close()`.
    #[error("client is closed")]
    Closed,

    /// Anything else, keeping a best-effort type name.
    #[error("{name}: {message}")]
    Other {
        /// Diagnostic name surfaced as the error kind
        name: String,
        /// Human-readable detail
        message: String,
    },
}

impl TransportError {
    /// The error kind reported in results.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransportError::Connect(_) => ErrorKind::ConnectionError,
            TransportError::ConnectTimeout(_) => ErrorKind::ConnectTimeout,
            TransportError::ReadTimeout(_) => ErrorKind::ReadTimeout,
            TransportError::Protocol(_) => ErrorKind::RemoteProtocolError,
            TransportError::Tls(_) => ErrorKind::SslError,
            TransportError::Read(_) => ErrorKind::ReadError,
            TransportError::Closed => ErrorKind::Other("ClientClosed".to_string()),
            TransportError::Other { name, .. } => ErrorKind::Other(name.clone()),
        }
    }

    /// Only read timeouts are retried at the transport layer.
    pub fn is_retriable(&self) -> bool {
        matches!(self, TransportError::ReadTimeout(_))
    }

    /// TLS failures are eligible for the `http://` fallback.
    pub fn is_tls(&self) -> bool {
        matches!(self, TransportError::Tls(_))
    }
}

/// Why no usable response was obtained for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// Connection refused / DNS resolution failure
    ConnectionError,
    /// TCP/TLS connect phase exceeded timeout
    ConnectTimeout,
    /// Response read phase exceeded timeout
    ReadTimeout,
    /// Malformed/unexpected protocol response from server
    RemoteProtocolError,
    /// TLS handshake/certificate failure
    SslError,
    /// Connection reset mid-read (commonly server-side blocking)
    ReadError,
    /// Redirect chain exceeded the hop limit
    MaxDepthReached,
    /// Unrecognized failure, named after its underlying type
    Other(String),
}

impl ErrorKind {
    /// Stable name used in results and statistics.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::ConnectTimeout => "ConnectTimeout",
            ErrorKind::ReadTimeout => "ReadTimeout",
            ErrorKind::RemoteProtocolError => "RemoteProtocolError",
            ErrorKind::SslError => "SSLError",
            ErrorKind::ReadError => "ReadError",
            ErrorKind::MaxDepthReached => "MaxDepthReached",
            ErrorKind::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&TransportError> for ErrorKind {
    fn from(error: &TransportError) -> Self {
        error.kind()
    }
}
