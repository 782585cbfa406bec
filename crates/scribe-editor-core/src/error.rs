use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by the strict entry points of the editor core.
///
/// The lenient operations never fail: unknown tokens, malformed comment
/// markup and history underflow all resolve to fallbacks.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("selection {start}..{end} is outside a buffer of {len} code units")]
    #[diagnostic(
        code(editor::invalid_range),
        help("selection offsets must satisfy 0 <= start <= end <= buffer length")
    )]
    InvalidRange { start: usize, end: usize, len: usize },
}
