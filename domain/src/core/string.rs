//! String utilities for the domain layer.

/// Shorten text for log lines and error messages.
///
/// Counts characters rather than bytes, collapses newlines into spaces and
/// appends `...` when anything was cut.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat: String = s
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        return flat;
    }

    let kept: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
