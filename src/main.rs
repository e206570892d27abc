//! Main application entry point (CLI binary).
//!
//! Thin wrapper around the `reachable` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger and TLS initialization
//!
//! Results go to stdout (or `--output`) as JSON Lines; the summary goes to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use reachable::initialization::{init_crypto_provider, init_logger_with};
use reachable::{run_check, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    init_crypto_provider();

    match run_check(config).await {
        Ok(report) => {
            eprintln!(
                "Checked {} URL{} ({} reachable, {} unreachable) in {:.1}s",
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.reachable,
                report.unreachable,
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("reachable error: {:#}", e);
            process::exit(1);
        }
    }
}
