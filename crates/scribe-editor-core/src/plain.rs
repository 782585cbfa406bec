//! Markdown to plain-text projection.
//!
//! The projection is lossy and one-way. Its inverse is the identity: an edit
//! in the plain-text view replaces the markdown buffer with the literal plain
//! text, so `plain_text_to_markdown(to_plain_text(md))` is the plain text,
//! never `md` once `md` carries any formatting.

use std::sync::LazyLock;

use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }
}

// Fenced blocks run before inline code and images before links, otherwise
// the earlier rules eat the backticks and brackets the later ones anchor on.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"```[\s\S]*?```", ""),
        Rule::new(r"(?m)^#{1,6}\s+", ""),
        Rule::new(r"\*\*(.+?)\*\*", "$1"),
        Rule::new(r"\*(.+?)\*", "$1"),
        Rule::new(r"__(.+?)__", "$1"),
        Rule::new(r"_(.+?)_", "$1"),
        Rule::new(r"~~(.+?)~~", "$1"),
        Rule::new(r"!\[.*?\]\(.+?\)", ""),
        Rule::new(r"\[(.*?)\]\(.+?\)", "$1"),
        Rule::new(r"`(.+?)`", "$1"),
        Rule::new(r"(?m)^>\s+", ""),
        Rule::new(r"(?m)^[*\-+]\s+", ""),
        Rule::new(r"(?m)^\d+\.\s+", ""),
    ]
});

/// Project markdown into the plain-text view.
pub fn to_plain_text(markdown: &str) -> String {
    let mut text = markdown.to_string();
    for rule in RULES.iter() {
        text = rule.pattern.replace_all(&text, rule.replacement).into_owned();
    }
    text.trim().to_string()
}

/// The inverse direction: plain text becomes the markdown verbatim.
pub fn plain_text_to_markdown(plain_text: &str) -> String {
    plain_text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headings_and_emphasis() {
        let md = "# Title\n\nSome **bold**, *italic*, __strong__ and _em_ and ~~gone~~.";
        assert_eq!(
            to_plain_text(md),
            "Title\n\nSome bold, italic, strong and em and gone."
        );
    }

    #[test]
    fn links_keep_text_and_images_vanish() {
        let md = "See [the docs](https://docs.rs) ![logo](logo.png) here";
        assert_eq!(to_plain_text(md), "See the docs  here");
    }

    #[test]
    fn badges_disappear_entirely() {
        let md = "[![Build Status](https://img.shields.io/badge/build-passing-brightgreen.svg)](#) ok";
        assert_eq!(to_plain_text(md), "ok");
    }

    #[test]
    fn fenced_code_is_removed_with_contents() {
        let md = "before\n\n```rust\nfn main() {}\n```\n\nafter `inline`";
        assert_eq!(to_plain_text(md), "before\n\n\n\nafter inline");
    }

    #[test]
    fn block_markers_are_stripped() {
        let md = "> quoted\n- one\n* two\n+ three\n1. first\n10. tenth";
        assert_eq!(to_plain_text(md), "quoted\none\ntwo\nthree\nfirst\ntenth");
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(to_plain_text("\n\n# Heading  \n\n"), "Heading");
    }

    #[test]
    fn projection_is_not_invertible() {
        let md = "# Title\n\n**bold** body";
        let plain = to_plain_text(md);
        let back = plain_text_to_markdown(&plain);
        assert_eq!(back, plain);
        assert_ne!(back, md);
    }

    #[test]
    fn plain_input_passes_through() {
        let text = "nothing to strip here";
        assert_eq!(to_plain_text(text), text);
        assert_eq!(plain_text_to_markdown(text), text);
    }
}
