//! reachable library: URL reachability checks
//!
//! Probes URLs over plain HTTP (or a headless browser), follows redirects by
//! hand so every hop is recorded, and flags Cloudflare protection,
//! JavaScript redirects and parked domains. Network failures are reported as
//! data in each [`ReachabilityResult`], never as errors.
//!
//! # Example
//!
//! ```no_run
//! use reachable::{is_reachable_concurrent, ReachabilityOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ReachabilityOptions {
//!     check_parking_domain: true,
//!     ..Default::default()
//! };
//!
//! let report = is_reachable_concurrent(vec!["example.com", "https://rust-lang.org"], &options, 8).await?;
//! for result in report.results() {
//!     println!("{} -> {} ({:?})", result.original_url, result.status_code, result.error_kind);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The async entry points require a Tokio runtime. [`is_reachable_blocking`]
//! creates its own and must be called from outside any runtime.

#![warn(missing_docs)]

pub mod app;
pub mod client;
pub mod config;
pub mod domain;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod models;
pub mod run;
pub mod user_agent;

// Re-export public API
pub use check::{run_check, CheckReport};
pub use client::{ClientKind, HttpClient, RequestOptions, ResponseSnapshot, Transport};
pub use config::{ClientConfig, Config, LogFormat, LogLevel};
pub use domain::tld_match;
pub use error_handling::{ErrorKind, InitializationError, ReachableError, TransportError};
pub use fetch::RedirectTrace;
pub use models::{Reachability, ReachabilityResult, UrlInput};
pub use run::{is_reachable, is_reachable_blocking, is_reachable_concurrent, ReachabilityOptions};

// Command-line run: input file to JSON Lines
mod check {
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::app::{print_final_statistics, read_urls};
    use crate::client::{HttpClient, Transport};
    use crate::config::Config;
    use crate::error_handling::ProcessingStats;
    use crate::export::{open_output, write_jsonl};
    use crate::run::{is_reachable, is_reachable_concurrent, ReachabilityOptions};

    /// Summary of a command-line run.
    #[derive(Debug, Clone)]
    pub struct CheckReport {
        /// URLs checked
        pub total_urls: usize,
        /// URLs with a 2xx terminal status
        pub reachable: usize,
        /// URLs without one
        pub unreachable: usize,
        /// Wall-clock duration of the run
        pub elapsed_seconds: f64,
    }

    /// Checks every URL listed in `config.file` and writes JSON Lines results.
    ///
    /// Ctrl-C stops admitting new URLs; results gathered so far are still
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the transport cannot be
    /// created, or the output cannot be written.
    pub async fn run_check(config: Config) -> Result<CheckReport> {
        let start = Instant::now();
        let urls = read_urls(&config.file).await?;

        let mut options = config
            .reachability_options()
            .map_err(|header| anyhow::anyhow!("Invalid header (expected 'Name: value'): {header}"))?;
        let client = build_transport(&config).await?;
        options.client = Some(Arc::clone(&client));

        let cancellation = options.cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing in-flight checks");
                cancellation.cancel();
            }
        });

        let outcome = if config.workers <= 1 {
            is_reachable(urls, &options).await
        } else {
            is_reachable_concurrent(urls, &options, config.workers).await
        };
        // The transport is ours; close it whatever happened
        client.close().await;
        let results = outcome.context("Reachability check failed")?.into_results();

        let mut output = open_output(config.output.as_deref())?;
        let written = write_jsonl(&mut *output, &results)?;
        info!("Wrote {written} result(s)");

        let stats = ProcessingStats::new();
        for result in &results {
            stats.record(result);
        }
        let elapsed_seconds = start.elapsed().as_secs_f64();
        print_final_statistics(&stats, elapsed_seconds);

        Ok(CheckReport {
            total_urls: stats.total(),
            reachable: stats.succeeded(),
            unreachable: stats.failed(),
            elapsed_seconds,
        })
    }

    async fn build_transport(config: &Config) -> Result<Arc<dyn Transport>> {
        if config.browser {
            return build_browser_transport(config).await;
        }
        let client_config = config
            .client_config()
            .map_err(|header| anyhow::anyhow!("Invalid header (expected 'Name: value'): {header}"))?;
        let client = HttpClient::new(&client_config).context("Failed to initialize HTTP client")?;
        Ok(Arc::new(client))
    }

    #[cfg(feature = "browser")]
    async fn build_browser_transport(config: &Config) -> Result<Arc<dyn Transport>> {
        use crate::client::{BrowserClient, ChromeDriver, ChromeSettings};

        let driver = ChromeDriver::launch(ChromeSettings {
            chrome_path: config.chrome_path.clone(),
            user_agent: config.user_agent.clone(),
            ..ChromeSettings::default()
        })
        .await
        .context("Failed to launch browser")?;
        Ok(Arc::new(
            BrowserClient::new(driver).with_ssl_fallback(config.ssl_fallback_to_http),
        ))
    }

    #[cfg(not(feature = "browser"))]
    async fn build_browser_transport(_config: &Config) -> Result<Arc<dyn Transport>> {
        anyhow::bail!("--browser requires reachable to be built with the `browser` feature")
    }
}
