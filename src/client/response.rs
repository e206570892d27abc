//! Transport-neutral response snapshot.

use reqwest::header::HeaderMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Immutable view of one HTTP response.
///
/// Produced by a transport, then only read: status, headers, (possibly
/// truncated) body bytes, and the URL the response was actually served from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSnapshot {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
    url: String,
}

impl ResponseSnapshot {
    /// Creates a snapshot.
    pub fn new(status: u16, headers: HeaderMap, body: Vec<u8>, url: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body,
            url: url.into(),
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes (empty for HEAD).
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Resolved URL of the response.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// First value of a header as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Status in [200, 300).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status in [300, 400).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Whether the body contains `needle` as a byte substring.
    pub fn body_contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        !needle.is_empty() && self.body.windows(needle.len()).any(|w| w == needle)
    }
}

impl Serialize for ResponseSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let headers: Vec<(&str, String)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let mut state = serializer.serialize_struct("ResponseSnapshot", 4)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("headers", &headers)?;
        state.serialize_field("body", &String::from_utf8_lossy(&self.body))?;
        state.end()
    }
}
