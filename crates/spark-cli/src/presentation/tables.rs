//! Table formatting utilities for CLI output.

/// Truncate to at most `max_len` characters, ending in "..." when cut.
///
/// ```rust
/// use spark_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("qwen", 10), "qwen");
/// assert_eq!(truncate_string("qwen2.5-coder", 8), "qwen2...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Display value or `default` when absent.
pub fn format_optional<T: std::fmt::Display>(value: Option<&T>, default: &str) -> String {
    value.map_or_else(|| default.to_string(), ToString::to_string)
}
