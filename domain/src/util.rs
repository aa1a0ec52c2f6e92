//! Shared utility functions.

/// Single-line preview of model output for diagnostic logs.
///
/// Line breaks become spaces and the text is cut after `max_chars`
/// characters, with `...` appended when anything was dropped.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text
        .chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if text.chars().nth(max_chars).is_some() {
        out.push_str("...");
    }
    out
}
