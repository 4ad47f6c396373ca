//! Output formatting utilities for CLI commands.
//!
//! Provides a unified `OutputFormat` enum plus the small text helpers the
//! listing commands share (timestamps, previews).

use chrono::NaiveDateTime;
use clap::ValueEnum;

/// Output format options for CLI commands.
///
/// - `Text` for human-readable terminal output (default)
/// - `Json` for machine-readable output and scripting
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default).
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Formats a record timestamp to the second, e.g. `2026-02-08 10:30:45`.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Formats only the time of day, e.g. `14:30`, for compact listings.
pub fn time_only(ts: &NaiveDateTime) -> String {
    ts.format("%H:%M").to_string()
}

/// Truncates text to at most `max` characters, ending in "..." when cut.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else if max <= 3 {
        ".".repeat(max)
    } else {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{kept}...")
    }
}

/// One-line preview of a prompt: whitespace runs (newlines included)
/// collapse to single spaces before truncation.
pub fn preview(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_text(&flat, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_output_format_default() {
        let format = OutputFormat::default();
        assert_eq!(format, OutputFormat::Text);
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("text", false).unwrap(),
            OutputFormat::Text
        );
        assert_eq!(
            OutputFormat::from_str("json", false).unwrap(),
            OutputFormat::Json
        );
        assert!(OutputFormat::from_str("markdown", false).is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let result = format_timestamp(&ts("2026-02-08T10:30:45.123456"));
        assert_eq!(result, "2026-02-08 10:30:45");
    }

    #[test]
    fn test_time_only() {
        assert_eq!(time_only(&ts("2026-02-08T14:30:45")), "14:30");
    }

    #[test]
    fn test_truncate_under_and_exact_limit() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_over_limit() {
        let result = truncate_text("hello world this is long", 10);
        assert_eq!(result, "hello w...");
        assert_eq!(result.chars().count(), 10);
    }

    #[test]
    fn test_truncate_very_small() {
        assert_eq!(truncate_text("hello", 3), "...");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_text("日本語のテキスト", 5), "日本...");
    }

    #[test]
    fn test_preview_flattens_newlines() {
        assert_eq!(preview("first line\n  second line", 40), "first line second line");
    }
}
