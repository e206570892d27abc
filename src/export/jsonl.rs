//! JSON Lines writer.

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::ReachabilityResult;

/// Writer adapter that treats a closed downstream pipe as success.
///
/// `reachable urls.txt | head` must not fail once `head` exits.
pub struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    /// Wraps `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.write(buf) {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(buf.len()),
            other => other,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.flush() {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    }
}

/// Opens the results destination: `path` if given, stdout otherwise.
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(IgnoreBrokenPipe::new(io::stdout().lock()))),
    }
}

/// Writes one JSON object per result and flushes.
///
/// # Returns
///
/// The number of records written.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_jsonl<W: Write + ?Sized>(writer: &mut W, results: &[ReachabilityResult]) -> Result<usize> {
    for result in results {
        serde_json::to_writer(&mut *writer, result)
            .with_context(|| format!("Failed to serialize result for {}", result.original_url))?;
        writer.write_all(b"\n").context("Failed to write output")?;
    }
    writer.flush().context("Failed to flush output")?;
    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind as ResultErrorKind;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_write_jsonl_one_object_per_line() {
        let mut ok = ReachabilityResult::new("https://a.com");
        ok.status_code = 200;
        ok.success = true;
        let mut failed = ReachabilityResult::new("https://b.com");
        failed.error_kind = Some(ResultErrorKind::ConnectionError);

        let mut buf = Vec::new();
        let written = write_jsonl(&mut buf, &[ok, failed]).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["original_url"], "https://b.com");
        assert_eq!(second["error_kind"], "ConnectionError");
    }

    #[test]
    fn test_broken_pipe_is_ignored() {
        let mut writer = IgnoreBrokenPipe::new(ClosedPipe);
        let results = vec![ReachabilityResult::new("https://a.com")];
        assert_eq!(write_jsonl(&mut writer, &results).unwrap(), 1);
    }

    #[test]
    fn test_other_write_errors_surface() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut writer = IgnoreBrokenPipe::new(Full);
        assert!(write_jsonl(&mut writer, &[ReachabilityResult::new("https://a.com")]).is_err());
    }
}
