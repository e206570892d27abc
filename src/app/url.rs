//! Input line handling for the command-line tool.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Maximum URL length accepted from input files, a common browser and server limit.
const MAX_URL_LENGTH: usize = 2048;

/// Cleans one input line.
///
/// Blank lines and `#` comments are skipped silently; overlong lines and
/// lines with inner whitespace are skipped with a warning. The scheme is left
/// untouched: adding one is the transport's job (`--ensure-protocol`).
///
/// # Returns
///
/// `Some(url)` if the line should be checked, `None` otherwise.
pub fn validate_and_normalize_url(line: &str) -> Option<String> {
    let trimmed = line.trim().trim_start_matches('\u{feff}');
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    if trimmed.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            trimmed.len(),
            MAX_URL_LENGTH,
            trimmed.chars().take(50).collect::<String>()
        );
        return None;
    }

    if trimmed.contains(char::is_whitespace) {
        warn!("Skipping line with embedded whitespace: {trimmed}");
        return None;
    }

    Some(trimmed.to_string())
}

/// Collects every usable URL from a line-oriented reader.
///
/// Unreadable lines (invalid UTF-8) are logged and skipped.
pub async fn collect_urls<R: AsyncBufRead + Unpin>(reader: R) -> Vec<String> {
    let mut lines = reader.lines();
    let mut urls = Vec::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => urls.extend(validate_and_normalize_url(&line)),
            Ok(None) => break,
            Err(e) => warn!("Failed to read line from input: {e}"),
        }
    }
    urls
}

/// Reads URLs from `path`, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn read_urls(path: &Path) -> Result<Vec<String>> {
    let urls = if path.as_os_str() == "-" {
        info!("Reading URLs from stdin");
        collect_urls(BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        collect_urls(BufReader::new(file)).await
    };
    info!("Total URLs in input: {}", urls.len());
    Ok(urls)
}
