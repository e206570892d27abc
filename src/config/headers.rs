//! Default request headers.
//!
//! Mimics a desktop Chrome navigation so that reachability checks see the same
//! answer a real visitor would. `Accept-Encoding` is left to reqwest, which
//! advertises the codecs it can decode (gzip, brotli, deflate, zstd).

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, TE, USER_AGENT,
};

/// Accept header sent with every request
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
/// Accept-Language header sent with every request
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US;q=0.7,en;q=0.3";

/// Builds the default header set around the given User-Agent.
///
/// Falls back to [`crate::config::DEFAULT_USER_AGENT`] if `user_agent` is not
/// a valid header value.
pub fn default_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let ua = HeaderValue::from_str(user_agent)
        .unwrap_or_else(|_| HeaderValue::from_static(super::DEFAULT_USER_AGENT));
    headers.insert(USER_AGENT, ua);
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(TE, HeaderValue::from_static("trailers"));
    headers
}

/// Parses `Name: value` pairs (as given on the command line) into a header map.
///
/// Returns the offending entry on failure.
pub fn parse_header_pairs<'a, I>(pairs: I) -> Result<HeaderMap, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut headers = HeaderMap::new();
    for pair in pairs {
        let (name, value) = pair.split_once(':').ok_or_else(|| pair.to_string())?;
        let name = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|_| pair.to_string())?;
        let value = HeaderValue::from_str(value.trim()).map_err(|_| pair.to_string())?;
        headers.append(name, value);
    }
    Ok(headers)
}
