//! Data structures exchanged with callers.
//!
//! This module contains:
//! - `ReachabilityResult` - one record per probed URL
//! - `UrlInput` - a single URL or a batch
//! - `Reachability` - the matching single or batch output

use serde::Serialize;

use crate::client::ResponseSnapshot;
use crate::error_handling::{ErrorKind, ReachableError};
use crate::fetch::RedirectTrace;

/// Outcome of probing one URL.
///
/// Created and filled in by a single probe, never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachabilityResult {
    /// Input string, as given
    pub original_url: String,
    /// URL of the terminal response after redirects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    /// Status of the terminal response, -1 if none was obtained
    pub status_code: i32,
    /// Terminal status in [200, 300)
    pub success: bool,
    /// Why no usable response was obtained
    pub error_kind: Option<ErrorKind>,
    /// Cloudflare marker in body or headers
    pub cloudflare_protection: bool,
    /// Body looks like a client-side redirect
    pub has_js_redirect: bool,
    /// Only set when the parking check was requested and a response was obtained
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_parking_domain: Option<bool>,
    /// Only set when at least one redirect was followed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectTrace>,
    /// Terminal response, kept on request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,
}

impl ReachabilityResult {
    /// Blank result for `original_url`: no response, no error yet.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            final_url: None,
            status_code: -1,
            success: false,
            error_kind: None,
            cloudflare_protection: false,
            has_js_redirect: false,
            is_parking_domain: None,
            redirect: None,
            response: None,
        }
    }
}

/// URLs to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlInput {
    /// One URL, answered with one result
    Single(String),
    /// A batch, answered with one result per distinct URL
    Many(Vec<String>),
}

impl UrlInput {
    /// Distinct URLs, first occurrence wins.
    pub fn unique_urls(&self) -> Vec<String> {
        match self {
            UrlInput::Single(url) => vec![url.clone()],
            UrlInput::Many(urls) => {
                let mut seen = std::collections::HashSet::new();
                urls.iter()
                    .filter(|url| seen.insert(url.as_str()))
                    .cloned()
                    .collect()
            }
        }
    }

    /// Whether the caller passed a single URL.
    pub fn is_single(&self) -> bool {
        matches!(self, UrlInput::Single(_))
    }
}

impl From<&str> for UrlInput {
    fn from(url: &str) -> Self {
        UrlInput::Single(url.to_string())
    }
}

impl From<String> for UrlInput {
    fn from(url: String) -> Self {
        UrlInput::Single(url)
    }
}

impl From<Vec<String>> for UrlInput {
    fn from(urls: Vec<String>) -> Self {
        UrlInput::Many(urls)
    }
}

impl From<Vec<&str>> for UrlInput {
    fn from(urls: Vec<&str>) -> Self {
        UrlInput::Many(urls.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for UrlInput {
    fn from(urls: &[&str]) -> Self {
        UrlInput::Many(urls.iter().map(|url| url.to_string()).collect())
    }
}

/// Dynamically shaped input (JSON, scripting front ends).
///
/// Accepts a string or an array of strings; anything else is rejected
/// before any network activity.
impl TryFrom<serde_json::Value> for UrlInput {
    type Error = ReachableError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::String(url) => Ok(UrlInput::Single(url)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(url) => Ok(url),
                    other => Err(ReachableError::InvalidInput(format!(
                        "array of {}",
                        json_type_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(UrlInput::Many),
            other => Err(ReachableError::InvalidInput(json_type_name(&other).to_string())),
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Results shaped like the input: one for a single URL, a list for a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reachability {
    /// Answer to [`UrlInput::Single`]
    Single(ReachabilityResult),
    /// Answer to [`UrlInput::Many`]
    Many(Vec<ReachabilityResult>),
}

impl Reachability {
    /// All results as a slice, whatever the shape.
    pub fn results(&self) -> &[ReachabilityResult] {
        match self {
            Reachability::Single(result) => std::slice::from_ref(result),
            Reachability::Many(results) => results,
        }
    }

    /// Owned results, whatever the shape.
    pub fn into_results(self) -> Vec<ReachabilityResult> {
        match self {
            Reachability::Single(result) => vec![result],
            Reachability::Many(results) => results,
        }
    }

    /// The single result, if the input was a single URL.
    pub fn single(&self) -> Option<&ReachabilityResult> {
        match self {
            Reachability::Single(result) => Some(result),
            Reachability::Many(_) => None,
        }
    }
}
