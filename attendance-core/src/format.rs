//! Shared display helpers.

/// Remaining time as `MM:SS`.
pub fn format_time(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// First 8 characters of a token, for filenames and labels.
pub fn short_token(token: &str) -> &str {
    match token.char_indices().nth(8) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_pads_both_fields() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(9), "00:09");
        assert_eq!(format_time(300), "05:00");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn test_short_token_is_safe_on_short_input() {
        assert_eq!(short_token("abcdef1234567890"), "abcdef12");
        assert_eq!(short_token("abc"), "abc");
        assert_eq!(short_token(""), "");
    }
}
