//! Input sanitation

/// Whitespace-collapsed, trimmed text bounded to a maximum character count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Collapse every whitespace run into one space, trim, then keep at most
/// `max_chars` characters. Total and side-effect free.
pub fn sanitize(raw: &str, max_chars: usize) -> SanitizedText {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let text = match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => collapsed[..cut].to_string(),
        None => collapsed,
    };

    SanitizedText(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_mixed_whitespace() {
        let text = sanitize("  Hello \t\n world\r\n\u{00A0} again  ", 100);
        assert_eq!(text.as_str(), "Hello world again");
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(sanitize("", 100).is_empty());
        assert!(sanitize(" \t\n\r ", 100).is_empty());
    }

    #[test]
    fn test_no_double_whitespace_or_edges() {
        let inputs = [
            "a  b",
            "\n\na\t\tb\n",
            "   lead",
            "trail   ",
            "x \u{2003}\u{2003} y \u{3000} z",
            "one\u{000B}\u{000C}two",
        ];

        for input in inputs {
            let text = sanitize(input, 1000).into_inner();
            assert_eq!(text.trim(), text, "edges of {:?}", input);
            let mut prev_ws = false;
            for c in text.chars() {
                assert!(!(prev_ws && c.is_whitespace()), "run in {:?}", text);
                prev_ws = c.is_whitespace();
            }
        }
    }

    #[test]
    fn test_truncates_to_exact_length() {
        let long = "word ".repeat(5000);
        let text = sanitize(&long, 10_000);
        assert_eq!(text.char_len(), 10_000);

        let text = sanitize(&"x".repeat(12), 10);
        assert_eq!(text.as_str(), "xxxxxxxxxx");
    }

    #[test]
    fn test_truncates_on_char_boundaries() {
        let text = sanitize(&"é".repeat(20), 7);
        assert_eq!(text.char_len(), 7);
        assert_eq!(text.as_str(), "ééééééé");
    }

    #[test]
    fn test_short_text_untouched() {
        let text = sanitize("already clean", 100);
        assert_eq!(text.as_str(), "already clean");
        assert_eq!(sanitize("exact", 5).as_str(), "exact");
    }
}
