//! Chat text normalization before mirroring.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Turns raw chat text into something fit for display.
pub trait TextFormatter: Send + Sync {
    fn format(&self, text: &str) -> String;
}

/// Formatter for live chat lines.
///
/// Strips control characters, collapses whitespace runs to one space, trims,
/// and cuts the result to `max_chars` characters with a trailing `…`.
#[derive(Debug, Clone, Copy)]
pub struct ChatTextFormatter {
    max_chars: usize,
}

impl ChatTextFormatter {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl TextFormatter for ChatTextFormatter {
    fn format(&self, text: &str) -> String {
        // Whitespace controls (\n, \t) become separators; the rest are dropped.
        let visible: String = text
            .chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect();
        let collapsed = WHITESPACE.replace_all(visible.trim(), " ");

        if collapsed.chars().count() <= self.max_chars {
            return collapsed.into_owned();
        }
        let mut out: String = collapsed.chars().take(self.max_chars).collect();
        out.truncate(out.trim_end().len());
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        let f = ChatTextFormatter::new(200);
        assert_eq!(f.format("hello"), "hello");
        assert_eq!(f.format("主播晚上好"), "主播晚上好");
    }

    #[test]
    fn whitespace_collapses_and_trims() {
        let f = ChatTextFormatter::new(200);
        assert_eq!(f.format("  hello \t\n  world  "), "hello world");
        assert_eq!(f.format("   "), "");
    }

    #[test]
    fn control_characters_are_stripped() {
        let f = ChatTextFormatter::new(200);
        assert_eq!(f.format("he\u{0007}llo\u{001b}"), "hello");
        assert_eq!(f.format("a\r\nb"), "a b");
    }

    #[test]
    fn long_text_is_truncated_by_chars() {
        let f = ChatTextFormatter::new(4);
        assert_eq!(f.format("abcd"), "abcd");
        assert_eq!(f.format("abcdef"), "abcd…");
        assert_eq!(f.format("哈哈哈哈哈哈"), "哈哈哈哈…");
        assert_eq!(f.format("abc def"), "abc…");
    }
}
