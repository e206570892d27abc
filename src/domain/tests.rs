// Domain module tests.

use super::*;

#[test]
fn test_parse_basic() {
    let parts = DomainParts::parse("https://www.example.com/path");
    assert_eq!(parts.subdomain, "www");
    assert_eq!(parts.domain, "example");
    assert_eq!(parts.suffix, "com");
    assert_eq!(parts.registrable_domain(), "example.com");
}

#[test]
fn test_parse_multi_part_suffix() {
    let parts = DomainParts::parse("https://shop.example.co.uk");
    assert_eq!(parts.subdomain, "shop");
    assert_eq!(parts.domain, "example");
    assert_eq!(parts.suffix, "co.uk");
}

#[test]
fn test_parse_multiple_subdomains() {
    let parts = DomainParts::parse("https://a.b.c.example.com");
    assert_eq!(parts.subdomain, "a.b.c");
    assert_eq!(parts.registrable_domain(), "example.com");
}

#[test]
fn test_parse_with_port_query_and_fragment() {
    let parts = DomainParts::parse("https://www.example.com:8080/path?query=1#fragment");
    assert_eq!(parts.registrable_domain(), "example.com");
}

#[test]
fn test_parse_bare_host() {
    let parts = DomainParts::parse("sub.example.com");
    assert_eq!(parts.subdomain, "sub");
    assert_eq!(parts.domain, "example");
    assert_eq!(parts.suffix, "com");

    let parts = DomainParts::parse("example.org:443/index.html");
    assert_eq!(parts.registrable_domain(), "example.org");
}

#[test]
fn test_parse_path_has_no_domain() {
    assert_eq!(DomainParts::parse("/login?next=/"), DomainParts::default());
    assert_eq!(DomainParts::parse("./relative"), DomainParts::default());
    assert_eq!(DomainParts::parse(""), DomainParts::default());
}

#[test]
fn test_parse_scheme_relative() {
    let parts = DomainParts::parse("//cdn.example.net/lib.js");
    assert_eq!(parts.subdomain, "cdn");
    assert_eq!(parts.registrable_domain(), "example.net");
}

#[test]
fn test_parse_ip_address() {
    let parts = DomainParts::parse("http://127.0.0.1:8080/");
    assert_eq!(parts.domain, "127.0.0.1");
    assert!(parts.suffix.is_empty());
    assert!(parts.fqdn().is_empty());

    let parts = DomainParts::parse("http://[::1]:8080/");
    assert_eq!(parts.domain, "::1");
    assert!(parts.fqdn().is_empty());
}

#[test]
fn test_parse_localhost() {
    let parts = DomainParts::parse("http://localhost:3000/");
    assert_eq!(parts.domain, "localhost");
    assert!(parts.suffix.is_empty());
    assert!(parts.fqdn().is_empty());
}

#[test]
fn test_parse_uppercase_and_trailing_dot() {
    let parts = DomainParts::parse("https://WWW.Example.COM./");
    assert_eq!(parts.fqdn(), "www.example.com");
}

#[test]
fn test_fqdn() {
    assert_eq!(
        DomainParts::parse("https://www.example.com/x").fqdn(),
        "www.example.com"
    );
    assert_eq!(DomainParts::parse("https://example.com").fqdn(), "example.com");
}

#[test]
fn test_host_of() {
    assert_eq!(
        host_of("https://user:pw@host.example.com:8443/a"),
        Some("host.example.com".to_string())
    );
    assert_eq!(
        host_of("host.example.com/a/b"),
        Some("host.example.com".to_string())
    );
    assert_eq!(host_of("/a/b"), None);
    assert_eq!(host_of("not a host"), None);
}

#[test]
fn test_tld_match_same_registrable_domain() {
    assert!(tld_match("sub.example.com", "example.com", true));
    assert!(tld_match("sub.example.com", "example.com", false));
    assert!(tld_match(
        "https://www.example.com/a",
        "https://example.com/b",
        true
    ));
}

#[test]
fn test_tld_match_suffix_change() {
    assert!(tld_match("example.com", "example.io", false));
    assert!(!tld_match("example.com", "example.io", true));
}

#[test]
fn test_tld_match_local_path() {
    assert!(tld_match("https://example.com", "/login", true));
    assert!(tld_match("https://example.com", "/login", false));
}

#[test]
fn test_tld_match_different_domains() {
    assert!(!tld_match("https://example.com", "https://other.com", false));
    assert!(!tld_match("https://example.com", "https://other.com", true));
}
