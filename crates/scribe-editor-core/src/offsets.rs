//! UTF-16 offset helpers.
//!
//! Selection offsets arrive as UTF-16 code units while Rust strings index by
//! UTF-8 byte. These helpers translate between the two without allocating.

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 offset into a byte offset into `text`.
///
/// Offsets past the end clamp to `text.len()`. An offset that lands between
/// the two halves of a surrogate pair snaps down to the start of that char.
pub fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return byte;
        }
        units = next;
    }
    text.len()
}

/// Convert a byte offset (on a char boundary) into a UTF-16 offset.
pub fn byte_to_utf16(text: &str, byte: usize) -> usize {
    let byte = byte.min(text.len());
    utf16_len(&text[..floor_char_boundary(text, byte)])
}

fn floor_char_boundary(text: &str, mut byte: usize) -> usize {
    while byte > 0 && !text.is_char_boundary(byte) {
        byte -= 1;
    }
    byte
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_offsets_are_identity() {
        let text = "hello";
        assert_eq!(utf16_len(text), 5);
        for i in 0..=5 {
            assert_eq!(utf16_to_byte(text, i), i);
            assert_eq!(byte_to_utf16(text, i), i);
        }
    }

    #[test]
    fn multibyte_chars_count_one_unit() {
        // 'é' is two UTF-8 bytes, one UTF-16 unit
        let text = "café!";
        assert_eq!(utf16_len(text), 5);
        assert_eq!(utf16_to_byte(text, 4), 5);
        assert_eq!(byte_to_utf16(text, 5), 4);
    }

    #[test]
    fn astral_chars_count_two_units() {
        let text = "a🎉b";
        assert_eq!(utf16_len(text), 4);
        assert_eq!(utf16_to_byte(text, 1), 1);
        // Middle of the surrogate pair snaps to the char start.
        assert_eq!(utf16_to_byte(text, 2), 1);
        assert_eq!(utf16_to_byte(text, 3), 5);
        assert_eq!(byte_to_utf16(text, 5), 3);
    }

    #[test]
    fn offsets_past_end_clamp() {
        assert_eq!(utf16_to_byte("abc", 10), 3);
        assert_eq!(byte_to_utf16("abc", 10), 3);
    }
}
