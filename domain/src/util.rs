//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
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

/// Single-line preview of free text for log lines and list views.
///
/// Newlines and runs of whitespace collapse to one space; text longer than
/// `max_bytes` is cut and suffixed with `...`.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= max_bytes {
        return flat;
    }
    format!("{}...", truncate_str(&flat, max_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "héllo";
        // 'é' occupies bytes 1..3
        assert_eq!(truncate_str(s, 2), "h");
        assert_eq!(truncate_str(s, 3), "hé");
    }

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview("a\n\n  b\tc", 20), "a b c");
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        assert_eq!(preview("hello world", 5), "hello...");
    }
}
