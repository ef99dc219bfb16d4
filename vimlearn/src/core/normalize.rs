//! Whitespace normalization used when grading an exercise.

/// Strip trailing whitespace from every line, drop trailing blank lines, and
/// rejoin with `\n`.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Two texts match when their normalized forms are identical.
pub fn texts_match(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_spaces_and_blank_lines_are_ignored() {
        assert!(texts_match("foo \nbar\n\n", "foo\nbar"));
        assert!(texts_match("this\n", "this"));
        assert!(texts_match("a\t\n  \n\n", "a"));
    }

    #[test]
    fn crlf_line_endings_match() {
        assert!(texts_match("one\r\ntwo\r\n", "one\ntwo"));
    }

    #[test]
    fn leading_whitespace_and_inner_blank_lines_matter() {
        assert!(!texts_match("  foo", "foo"));
        assert!(!texts_match("a\n\nb", "a\nb"));
        assert!(!texts_match("\tprint('hi')", "print('hi')"));
    }

    #[test]
    fn content_differences_fail() {
        assert!(!texts_match("delete this", "this"));
        assert!(!texts_match("", "x"));
    }

    #[test]
    fn empty_and_whitespace_only_texts_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n \n\t\n"), "");
    }
}
