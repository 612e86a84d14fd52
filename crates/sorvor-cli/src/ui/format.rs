//! Formatting helpers for sizes, durations and build output listings.

use console::Term;
use owo_colors::{OwoColorize, Stream};
use std::time::Duration;

/// Format a byte count with the largest fitting unit.
///
/// ```
/// use sorvor_cli::ui::format_size;
///
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1536), "1.50 KB");
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
/// use sorvor_cli::ui::format_duration;
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

/// Print the files a build produced, with sizes and the total build time.
pub fn print_outputs(files: &[(String, u64)], elapsed: Duration) {
    let width = (Term::stderr().size().1 as usize).clamp(20, 80);

    eprintln!("{}", "─".repeat(width));
    for (name, size) in files {
        let size = format_size(*size);
        eprintln!(
            "  {} {} {}",
            "▸".if_supports_color(Stream::Stderr, |t| t.blue()),
            name.if_supports_color(Stream::Stderr, |t| t.bold()),
            size.if_supports_color(Stream::Stderr, |t| t.dimmed())
        );
    }
    eprintln!("{}", "─".repeat(width));

    let total: u64 = files.iter().map(|(_, size)| size).sum();
    eprintln!(
        "  {} file(s), {} in {}",
        files.len(),
        format_size(total),
        format_duration(elapsed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1_572_864), "1.50 MB");
        assert_eq!(format_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_print_outputs() {
        print_outputs(
            &[
                ("index.html".to_string(), 512),
                ("index.js".to_string(), 15_234),
            ],
            Duration::from_millis(42),
        );
        print_outputs(&[], Duration::ZERO);
    }
}
