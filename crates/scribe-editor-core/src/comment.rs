//! Private note annotations embedded in markdown.
//!
//! A comment span is `[[comment: <body>]]`, matched non-greedily so the body
//! ends at the first `]]`. Spans never cross a line break. Unterminated
//! markers do not match and stay in the text verbatim.

use std::sync::LazyLock;

use regex::Regex;

/// Opening marker of a comment span.
pub const COMMENT_OPEN: &str = "[[comment: ";

/// Canonical placeholder inserted when there is no selection to wrap.
pub const COMMENT_TEMPLATE: &str = "[[comment: Your note here]]";

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[comment:(.*?)\]\]").unwrap());

/// Remove every comment span, producing the public view of the document.
pub fn strip(text: &str) -> String {
    COMMENT_RE.replace_all(text, "").into_owned()
}

pub fn has_comments(text: &str) -> bool {
    COMMENT_RE.is_match(text)
}

/// Comment bodies in document order, delimiters removed and whitespace trimmed.
pub fn extract(text: &str) -> Vec<String> {
    COMMENT_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
        .collect()
}

pub fn template() -> &'static str {
    COMMENT_TEMPLATE
}

/// Wrap `body` as a comment span.
pub fn wrap(body: &str) -> String {
    format!("{COMMENT_OPEN}{body}]]")
}
