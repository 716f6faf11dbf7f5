//! Report Module
//!
//! Summary reporting for batch operations.

use crate::batch::BatchResult;
use crate::progress::{format_bytes, format_duration};
use std::fmt::Write;
use std::time::Duration;

const RULE: &str = "╠══════════════════════════════════════════════════════════════╣";

pub fn format_summary_report(result: &BatchResult, duration: Duration, operation_name: &str) -> String {
    let reduction = if result.input_bytes > 0 {
        (1.0 - result.output_bytes as f64 / result.input_bytes as f64) * 100.0
    } else {
        0.0
    };

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(out, "║  📊 {:<57}║", format!("{} Summary Report", operation_name));
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "║  📁 Eligible Files:     {:>10}                           ║", result.total);
    let _ = writeln!(out, "║  ✅ Succeeded:          {:>10}                           ║", result.succeeded);
    let _ = writeln!(out, "║  ❌ Failed:             {:>10}                           ║", result.failed);
    let _ = writeln!(out, "║  ⏭️  Skipped:            {:>10}                           ║", result.skipped);
    let _ = writeln!(out, "║  📈 Success Rate:       {:>9.1}%                           ║", result.success_rate());
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "║  💾 Input Size:         {:>10}                           ║", format_bytes(result.input_bytes));
    let _ = writeln!(out, "║  💾 Output Size:        {:>10}                           ║", format_bytes(result.output_bytes));
    let _ = writeln!(out, "║  📉 Size Reduction:     {:>9.1}%                           ║", reduction);
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "║  ⏱️  Total Time:         {:>10}                           ║", format_duration(duration));
    if result.attempted() > 0 {
        let avg_time = duration.as_secs_f64() / result.attempted() as f64;
        let _ = writeln!(out, "║  ⏱️  Avg Time/File:      {:>9.2}s                           ║", avg_time);
    }
    let _ = writeln!(out, "╚══════════════════════════════════════════════════════════════╝");

    if result.cancelled {
        let _ = writeln!(out, "\n⚠️  Run cancelled: {} file(s) not attempted", result.skipped);
    }

    if !result.errors.is_empty() {
        let _ = writeln!(out, "\n❌ Errors encountered:");
        let _ = writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        for (path, error) in &result.errors {
            let _ = writeln!(out, "   {} → {}", path.display(), error);
        }
    }

    out
}

pub fn print_summary_report(result: &BatchResult, duration: Duration, operation_name: &str) {
    print!("{}", format_summary_report(result, duration, operation_name));
}

pub fn print_simple_summary(result: &BatchResult) {
    println!(
        "\n✅ Complete: {} succeeded, {} failed, {} skipped (total: {})",
        result.succeeded, result.failed, result.skipped, result.total
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_lists_counts_and_errors() {
        let mut result = BatchResult::new(3);
        result.success(2048, 1024);
        result.fail(PathBuf::from("in/broken.jpg"), "decode failed".to_string());

        let report = format_summary_report(&result, Duration::from_secs(3), "EXIF Scrub");
        assert!(report.contains("EXIF Scrub Summary Report"));
        assert!(report.contains("50.0%"), "size reduction should be 50%");
        assert!(report.contains("in/broken.jpg → decode failed"));
        assert!(!report.contains("Run cancelled"));
    }

    #[test]
    fn test_report_mentions_cancellation() {
        let mut result = BatchResult::new(4);
        result.success(10, 5);
        result.cancel();

        let report = format_summary_report(&result, Duration::from_secs(1), "EXIF Scrub");
        assert!(report.contains("Run cancelled: 3 file(s) not attempted"));
    }

    #[test]
    fn test_report_empty_batch() {
        let result = BatchResult::new(0);
        let report = format_summary_report(&result, Duration::ZERO, "EXIF Scrub");
        assert!(report.contains("100.0%"));
        assert!(!report.contains("Avg Time/File"));
    }
}
