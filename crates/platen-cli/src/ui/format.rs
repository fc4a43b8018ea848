//! Formatting utilities for sizes, durations, and site summaries.

use super::paint;
use console::Term;
use owo_colors::Style;
use std::time::Duration;

/// Format a byte count using the largest fitting unit (B, KB, MB, GB).
///
/// ```
/// use platen_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.2} {}", size, UNITS[unit])
    }
}

/// Format a duration as `ms`, seconds, or `Xm Ys`.
///
/// ```
/// use std::time::Duration;
/// use platen_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print a one-line summary of a generated site to stderr.
///
/// ```no_run
/// use std::time::Duration;
/// use platen_cli::ui::print_site_summary;
///
/// print_site_summary("output", 42, 1_234_567, Duration::from_millis(2300));
/// ```
pub fn print_site_summary(output_dir: &str, files: usize, bytes: u64, elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).min(60);

    let dim = Style::new().dimmed();

    eprintln!("{}", paint(&"─".repeat(width), dim));
    eprintln!(
        "  {} {} {} {}",
        paint("▸", Style::new().blue()),
        paint(output_dir, Style::new().bright_white().bold()),
        paint(&format!("{} files, {}", files, format_size(bytes)), dim),
        paint(&format!("({})", format_duration(elapsed)), dim)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(10_485_760), "10.00 MB");
        assert_eq!(format_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_print_site_summary() {
        print_site_summary("output", 3, 4096, Duration::from_millis(450));
        print_site_summary("output", 0, 0, Duration::ZERO);
    }
}
