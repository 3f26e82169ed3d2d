//! Terminal output helpers: fixed-width columns and human-readable
//! timestamps, frequencies and durations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Local, TimeZone};
use serde_json::Value;

/// Pad a string to a column width with trailing spaces. Longer strings
/// are returned unchanged rather than truncated.
pub fn fill_space(s: &str, length: usize) -> String {
    if s.len() < length {
        format!("{s}{}", " ".repeat(length - s.len()))
    } else {
        s.to_string()
    }
}

/// Format an epoch-milliseconds timestamp as `YYYY-MM-DD, HH:MM:SS` in
/// local time. Anything unrepresentable is passed through as text.
pub fn format_time(value: &Value) -> String {
    match value.as_i64().and_then(|ms| {
        let seconds = ms.div_euclid(1000);
        let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;
        Local.timestamp_opt(seconds, nanos).single()
    }) {
        Some(t) => t.format("%Y-%m-%d, %H:%M:%S").to_string(),
        None => value_text(value),
    }
}

/// Render a frequency in minutes as `45m`, `2h` or `2h30m`.
pub fn format_frequency(minutes: i64) -> String {
    if minutes > 60 {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h{rest}m")
        }
    } else {
        format!("{minutes}m")
    }
}

/// Render a duration in milliseconds at a readable scale.
pub fn format_duration_ms(ms: f64) -> String {
    if ms > 60_000.0 {
        format!("{:.2}min", ms / 60_000.0)
    } else if ms > 1_000.0 {
        format!("{:.2}s", ms / 1_000.0)
    } else {
        format!("{ms}ms")
    }
}

/// A JSON scalar as bare text; arrays and objects as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Base64 used when echoing tokens back in `config list --show-token`.
pub fn encode_token(token: &str) -> String {
    STANDARD.encode(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fill_space_pads_but_never_truncates() {
        assert_eq!(fill_space("ab", 5), "ab   ");
        assert_eq!(fill_space("abcdef", 3), "abcdef");
    }

    #[test]
    fn frequency_rendering() {
        assert_eq!(format_frequency(15), "15m");
        assert_eq!(format_frequency(60), "60m");
        assert_eq!(format_frequency(120), "2h");
        assert_eq!(format_frequency(150), "2h30m");
    }

    #[test]
    fn duration_scales() {
        assert_eq!(format_duration_ms(512.0), "512ms");
        assert_eq!(format_duration_ms(2_500.0), "2.50s");
        assert_eq!(format_duration_ms(90_000.0), "1.50min");
    }

    #[test]
    fn non_numeric_time_is_passed_through() {
        assert_eq!(format_time(&json!("N/A")), "N/A");
    }

    #[test]
    fn scalar_text() {
        assert_eq!(value_text(&json!("plain")), "plain");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(["a"])), "[\"a\"]");
    }
}
