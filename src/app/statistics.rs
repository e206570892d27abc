//! End-of-run statistics.

use log::info;

use crate::error_handling::ProcessingStats;

/// Logs per-error-kind counts, if any.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total_errors = stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for (kind, count) in stats.error_counts() {
        info!("   {}: {}", kind, count);
    }
}

/// Logs the batch summary followed by the error breakdown.
pub fn print_final_statistics(stats: &ProcessingStats, elapsed_seconds: f64) {
    let total = stats.total();
    info!(
        "Checked {} URL{} ({} reachable, {} not) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        stats.succeeded(),
        stats.failed(),
        elapsed_seconds
    );

    let flagged = [
        ("Redirected", stats.redirected()),
        ("Cloudflare protected", stats.cloudflare()),
        ("JavaScript redirect", stats.js_redirect()),
        ("Parked domain", stats.parked()),
    ];
    for (label, count) in flagged.iter().filter(|(_, count)| *count > 0) {
        info!("   {}: {}", label, count);
    }

    print_error_statistics(stats);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::models::ReachabilityResult;

    #[test]
    fn test_print_statistics_empty() {
        let stats = ProcessingStats::new();
        print_final_statistics(&stats, 0.0);
    }

    #[test]
    fn test_print_statistics_with_errors() {
        let stats = ProcessingStats::new();
        let mut result = ReachabilityResult::new("https://down.example");
        result.error_kind = Some(ErrorKind::ConnectTimeout);
        stats.record(&result);
        result.error_kind = Some(ErrorKind::Other("DecodeError".into()));
        stats.record(&result);

        print_final_statistics(&stats, 1.5);
        assert_eq!(stats.total_errors(), 2);
    }
}
