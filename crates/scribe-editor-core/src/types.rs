//! Core editor types: selection ranges, insertion results, and views.
//!
//! These types are framework-agnostic. Offsets are UTF-16 code units, the
//! unit a browser text control reports through `selectionStart`/`selectionEnd`.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// A selection in a buffer, measured in UTF-16 code units.
///
/// `start == end` is a caret. A well-formed range satisfies
/// `start <= end <= len(buffer)`; use [`SelectionRange::normalize`] and
/// [`SelectionRange::clamp`] to coerce caller input into that shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Normalize and pin both ends into `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        let range = self.normalize();
        Self {
            start: range.start.min(len),
            end: range.end.min(len),
        }
    }

    /// Strict check that the range is well-formed for a buffer of `len` units.
    pub fn validate(self, len: usize) -> Result<Self, EditorError> {
        if self.start <= self.end && self.end <= len {
            Ok(self)
        } else {
            Err(EditorError::InvalidRange {
                start: self.start,
                end: self.end,
                len,
            })
        }
    }
}

impl From<std::ops::Range<usize>> for SelectionRange {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<SelectionRange> for std::ops::Range<usize> {
    fn from(r: SelectionRange) -> Self {
        r.start..r.end
    }
}

/// Result of a buffer transformation: the whole new buffer plus the caret.
///
/// `cursor` is a UTF-16 offset into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insertion {
    pub text: String,
    pub cursor: usize,
}

/// The three surfaces of the editor.
///
/// `Preview` is read-only rendered output; edits issued while it is active
/// target the markdown buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Preview,
    Markdown,
    PlainText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_swaps_reversed_bounds() {
        let range = SelectionRange::new(7, 3).normalize();
        assert_eq!(range, SelectionRange::new(3, 7));
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn clamp_pins_to_buffer_length() {
        assert_eq!(
            SelectionRange::new(12, 4).clamp(5),
            SelectionRange::new(4, 5)
        );
        assert_eq!(SelectionRange::caret(99).clamp(3), SelectionRange::caret(3));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(SelectionRange::new(0, 5).validate(5).is_ok());
        let err = SelectionRange::new(2, 6).validate(5).unwrap_err();
        assert!(matches!(
            err,
            EditorError::InvalidRange {
                start: 2,
                end: 6,
                len: 5
            }
        ));
        assert!(SelectionRange::new(3, 1).validate(5).is_err());
    }

    #[test]
    fn view_uses_snake_case_names() {
        let json = serde_json::to_string(&View::PlainText).unwrap();
        assert_eq!(json, "\"plain_text\"");
    }
}
