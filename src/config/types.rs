//! Configuration types and CLI options.
//!
//! This module defines the enums and structs used for command-line argument
//! parsing and for configuring the HTTP transport programmatically.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use reqwest::header::HeaderMap;

use crate::config::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, DEFAULT_WORKERS,
};
use crate::config::headers::parse_header_pairs;
use crate::run::ReachabilityOptions;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Settings for the reqwest-backed transport.
///
/// Instance-level flags (`include_host`, `ssl_fallback_to_http`,
/// `ensure_protocol_url`) are OR-merged with the per-call flags.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Replaces the default browser-like header set when present
    pub headers: Option<HeaderMap>,
    /// Send a `Host` header computed from the URL's registrable domain
    pub include_host: bool,
    /// Retry once over `http://` after a TLS failure
    pub ssl_fallback_to_http: bool,
    /// Force non-http(s) or missing schemes to `https://`
    pub ensure_protocol_url: bool,
    /// TCP + TLS connect timeout
    pub connect_timeout: Duration,
    /// Read timeout for each network call
    pub read_timeout: Duration,
    /// Extra attempts after a read timeout (0 disables retrying)
    pub read_timeout_retries: usize,
    /// Proxy URL applied to all schemes
    pub proxy: Option<String>,
    /// Fixed User-Agent (otherwise sampled from the rotating pool)
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            headers: None,
            include_host: false,
            ssl_fallback_to_http: false,
            ensure_protocol_url: false,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
            read_timeout_retries: 0,
            proxy: None,
            user_agent: None,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Check every URL in a file, 20 at a time
/// reachable urls.txt --workers 20
///
/// # Sequential, no jitter, with parking detection, results to a file
/// cat urls.txt | reachable - --workers 1 --no-sleep --check-parking-domain -o results.jsonl
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reachable",
    version,
    about = "Checks whether URLs are reachable, following redirects and flagging bot protection."
)]
pub struct Config {
    /// File with one URL per line ("-" reads stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Probes in flight at once (1 runs sequentially)
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Always use GET instead of trying HEAD first
    #[arg(long)]
    pub no_head: bool,

    /// Disable the random 1-2s pause before each request
    #[arg(long)]
    pub no_sleep: bool,

    /// Do not send a Host header derived from the URL
    #[arg(long)]
    pub no_host_header: bool,

    /// Retry over http:// when the TLS handshake fails
    #[arg(long)]
    pub ssl_fallback_to_http: bool,

    /// Probe a random path to detect parked domains
    #[arg(long)]
    pub check_parking_domain: bool,

    /// Keep the terminal response (headers and body) in the output
    #[arg(long)]
    pub include_response: bool,

    /// Force URLs without an http(s) scheme to https://
    #[arg(long)]
    pub ensure_protocol: bool,

    /// Read timeout in seconds
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_seconds: u64,

    /// Retries after a read timeout
    #[arg(long, default_value_t = 0)]
    pub retries: usize,

    /// Proxy URL for all requests
    #[arg(long, env = "REACHABLE_PROXY")]
    pub proxy: Option<String>,

    /// Fixed User-Agent instead of a rotating Chrome one
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Extra request header ("Name: value"), replaces the default set
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Write JSON Lines results to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Use headless Chrome instead of plain HTTP (requires the `browser` feature)
    #[arg(long)]
    pub browser: bool,

    /// Chrome/Chromium executable for --browser
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urls.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            workers: DEFAULT_WORKERS,
            no_head: false,
            no_sleep: false,
            no_host_header: false,
            ssl_fallback_to_http: false,
            check_parking_domain: false,
            include_response: false,
            ensure_protocol: false,
            timeout_seconds: DEFAULT_READ_TIMEOUT_SECS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            retries: 0,
            proxy: None,
            user_agent: None,
            headers: Vec::new(),
            output: None,
            browser: false,
            chrome_path: None,
        }
    }
}

impl Config {
    /// Transport settings derived from the command line.
    ///
    /// # Errors
    ///
    /// Returns the offending entry if a `--header` value is not `Name: value`.
    pub fn client_config(&self) -> Result<ClientConfig, String> {
        let headers = if self.headers.is_empty() {
            None
        } else {
            Some(parse_header_pairs(self.headers.iter().map(String::as_str))?)
        };
        Ok(ClientConfig {
            headers,
            include_host: !self.no_host_header,
            ssl_fallback_to_http: self.ssl_fallback_to_http,
            ensure_protocol_url: self.ensure_protocol,
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
            read_timeout: Duration::from_secs(self.timeout_seconds),
            read_timeout_retries: self.retries,
            proxy: self.proxy.clone(),
            user_agent: self.user_agent.clone(),
        })
    }

    /// Orchestrator options derived from the command line.
    ///
    /// # Errors
    ///
    /// Same as [`Config::client_config`].
    pub fn reachability_options(&self) -> Result<ReachabilityOptions, String> {
        let client_config = self.client_config()?;
        Ok(ReachabilityOptions {
            headers: client_config.headers.clone(),
            include_host: client_config.include_host,
            sleep_between_requests: !self.no_sleep,
            head_optim: !self.no_head,
            include_response: self.include_response,
            ssl_fallback_to_http: self.ssl_fallback_to_http,
            check_parking_domain: self.check_parking_domain,
            client_config,
            ..ReachabilityOptions::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_format_debug() {
        assert_eq!(format!("{:?}", LogFormat::Plain), "Plain");
        assert_eq!(format!("{:?}", LogFormat::Json), "Json");
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert!(!config.include_host);
        assert!(!config.ssl_fallback_to_http);
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout_retries, 0);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_config_default_maps_to_reachability_defaults() {
        let options = Config::default().reachability_options().unwrap();
        assert!(options.include_host);
        assert!(options.sleep_between_requests);
        assert!(options.head_optim);
        assert!(!options.include_response);
        assert!(!options.ssl_fallback_to_http);
        assert!(!options.check_parking_domain);
        assert!(options.client.is_none());
    }

    #[test]
    fn test_config_flags_are_inverted() {
        let config = Config {
            no_head: true,
            no_sleep: true,
            no_host_header: true,
            ..Default::default()
        };
        let options = config.reachability_options().unwrap();
        assert!(!options.head_optim);
        assert!(!options.sleep_between_requests);
        assert!(!options.include_host);
        assert!(!options.client_config.include_host);
    }

    #[test]
    fn test_config_bad_header_is_reported() {
        let config = Config {
            headers: vec!["broken".to_string()],
            ..Default::default()
        };
        assert_eq!(config.client_config().unwrap_err(), "broken");
    }
}
