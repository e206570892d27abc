//! Registrable-domain extraction and comparison.
//!
//! Hostnames are split into subdomain / domain label / public suffix using
//! the Public Suffix List (`psl`), so that `www.example.co.uk` yields
//! `www` / `example` / `co.uk` rather than whatever a naive dot split gives.
//!
//! Key functions:
//! - `DomainParts::parse()` - splits a URL, bare host or path
//! - `tld_match()` - loose or strict registrable-domain equality

use std::net::IpAddr;

/// The three PSL-aware components of a hostname.
///
/// All components are empty for inputs without a host (for example a bare
/// path such as `/login`). Hosts without a known public suffix (`localhost`,
/// intranet names) keep their last label as `domain` and an empty `suffix`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    /// Labels left of the registrable domain (`www`, `a.b`)
    pub subdomain: String,
    /// Registrable label (`example`)
    pub domain: String,
    /// Public suffix (`com`, `co.uk`)
    pub suffix: String,
}

impl DomainParts {
    /// Splits the host of `input` into its components.
    ///
    /// `input` may be an absolute URL, a scheme-less host with optional
    /// port and path (`sub.example.com:8080/x`), or a path.
    pub fn parse(input: &str) -> Self {
        match host_of(input) {
            Some(host) => Self::from_host(&host),
            None => Self::default(),
        }
    }

    fn from_host(host: &str) -> Self {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        if host.is_empty() {
            return Self::default();
        }

        let bare = host.trim_start_matches('[').trim_end_matches(']');
        if bare.parse::<IpAddr>().is_ok() {
            return DomainParts {
                domain: bare.to_string(),
                ..Default::default()
            };
        }

        let suffix_len = psl::suffix(host.as_bytes())
            .filter(|suffix| suffix.is_known())
            .map(|suffix| suffix.as_bytes().len())
            .unwrap_or(0);

        if suffix_len >= host.len() {
            // The host is itself a public suffix (`co.uk`)
            return DomainParts {
                suffix: host,
                ..Default::default()
            };
        }

        let (rest, suffix) = if suffix_len == 0 {
            (host.as_str(), "")
        } else {
            let split = host.len() - suffix_len;
            (&host[..split - 1], &host[split..])
        };

        let (subdomain, domain) = match rest.rsplit_once('.') {
            Some((sub, domain)) => (sub, domain),
            None => ("", rest),
        };

        DomainParts {
            subdomain: subdomain.to_string(),
            domain: domain.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// `domain.suffix`, or just the domain label when there is no suffix.
    pub fn registrable_domain(&self) -> String {
        if self.suffix.is_empty() {
            self.domain.clone()
        } else if self.domain.is_empty() {
            String::new()
        } else {
            format!("{}.{}", self.domain, self.suffix)
        }
    }

    /// Fully qualified name, empty unless both domain and suffix are known.
    ///
    /// Used for the `Host` header; IPs and `localhost` yield an empty string
    /// so no header is injected for them.
    pub fn fqdn(&self) -> String {
        if self.domain.is_empty() || self.suffix.is_empty() {
            return String::new();
        }
        if self.subdomain.is_empty() {
            format!("{}.{}", self.domain, self.suffix)
        } else {
            format!("{}.{}.{}", self.subdomain, self.domain, self.suffix)
        }
    }
}

/// Extracts the host part of a URL, bare host, or `host/path` string.
///
/// Returns `None` for paths (`/a/b`, `//` aside) and for strings without a
/// host component.
pub fn host_of(input: &str) -> Option<String> {
    let input = input.trim();
    if input.contains("://") {
        return url::Url::parse(input)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .filter(|host| !host.is_empty());
    }
    if let Some(rest) = input.strip_prefix("//") {
        return host_of(&format!("http://{rest}"));
    }
    if input.is_empty() || input.starts_with('/') || input.starts_with('.') {
        return None;
    }

    let authority = input
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    let host = if authority.starts_with('[') {
        authority
            .split_once(']')
            .map(|(h, _)| format!("{h}]"))
            .unwrap_or_else(|| authority.to_string())
    } else {
        authority.split(':').next().unwrap_or(authority).to_string()
    };

    if host.is_empty() || host.contains(char::is_whitespace) {
        None
    } else {
        Some(host)
    }
}

/// Heuristic equality of two URLs' registrable domains.
///
/// Matches when both have the same domain label and suffix, when the labels
/// match and `strict_suffix` is off (`example.com` vs `example.io`), or when
/// `b` has no domain at all (a local, path-only redirect).
pub fn tld_match(a: &str, b: &str, strict_suffix: bool) -> bool {
    let first = DomainParts::parse(a);
    let second = DomainParts::parse(b);

    let same_domain = first.domain == second.domain;
    (same_domain && (first.suffix == second.suffix || !strict_suffix)) || second.domain.is_empty()
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
