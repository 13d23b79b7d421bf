//! Small text helpers shared by the services and the CLI

/// Trim surrounding whitespace and drop angle brackets
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

/// Render a millisecond duration as `"<h>h <m>m"`
pub fn format_remaining(ms: u64) -> String {
    let total_minutes = ms / 60_000;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  hello  "), "hello");
        assert_eq!(
            sanitize_input("<script>alert(1)</script>"),
            "scriptalert(1)/script"
        );
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "0h 0m");
        assert_eq!(format_remaining(59_999), "0h 0m");
        assert_eq!(format_remaining(90 * 60_000), "1h 30m");
        assert_eq!(format_remaining(86_400_000 - 60_000), "23h 59m");
    }
}
