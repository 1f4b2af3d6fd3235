//! Shared utility functions.

use serde_json::Value;

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// One-line rendering of a step input/output value for logs and consoles.
///
/// Strings are shown without quotes, everything else as compact JSON.
/// Anything longer than `max_bytes` is cut and suffixed with `...`.
pub fn preview_value(value: &Value, max_bytes: usize) -> String {
    let text = match value {
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    };
    if text.len() <= max_bytes {
        return text;
    }
    format!("{}...", truncate_str(&text, max_bytes))
}
