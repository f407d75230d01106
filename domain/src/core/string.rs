//! String utilities for the domain layer.

use serde_json::Value;

const ELLIPSIS: &str = "...";

/// Shorten `s` to at most `max_len` bytes, marking the cut with `...`.
///
/// The cut never splits a character, so the kept prefix may be shorter
/// than the byte budget allows.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(ELLIPSIS.len());
    let cut = s
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= budget)
        .last()
        .unwrap_or(0);
    format!("{}{}", &s[..cut], ELLIPSIS)
}

/// Render a parameter value as a short single-line preview.
///
/// Strings are shown without quotes, everything else as compact JSON.
pub fn preview_value(value: &Value, max_len: usize) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let single_line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&single_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_cyrillic() {
        // Each Cyrillic letter is 2 bytes
        assert_eq!(truncate("выполни", 20), "выполни");
        // max_len=9 -> target=6 -> "вып" (6 bytes)
        assert_eq!(truncate("выполни", 9), "вып...");
        // max_len=10 -> target=7 -> backs up to 6
        assert_eq!(truncate("выполни", 10), "вып...");
    }

    #[test]
    fn test_truncate_mixed_width() {
        // "a" is 1 byte, "é" 2, "日" 3, "🦀" 4
        let s = "aé日🦀z";
        assert_eq!(truncate(s, 11), s);
        assert_eq!(truncate(s, 8), "aé...");
        assert_eq!(truncate(s, 10), "aé日...");
        assert_eq!(truncate(s, 3), "...");
        assert_eq!(truncate(s, 0), "...");
    }

    #[test]
    fn test_preview_value() {
        assert_eq!(preview_value(&Value::String("ls  -la\n/tmp".into()), 40), "ls -la /tmp");
        assert_eq!(preview_value(&serde_json::json!(["a", "b"]), 40), r#"["a","b"]"#);
        assert_eq!(preview_value(&Value::String("x".repeat(20)), 10), "xxxxxxx...");
    }
}
