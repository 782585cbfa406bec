//! HTML escaping and entity decoding shared by the TOC and export paths.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;

use pulldown_cmark_escape::StrWrite;

/// String sink for the escape functions. Pushing to a `String` cannot fail.
#[derive(Debug, Default)]
struct EscapedString(String);

impl StrWrite for EscapedString {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Infallible> {
        self.0.push_str(&args.to_string());
        Ok(())
    }
}

/// Escape text for element content or a double-quoted attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = EscapedString(String::with_capacity(text.len()));
    match pulldown_cmark_escape::escape_html(&mut out, text) {
        Ok(()) => out.0,
        Err(never) => match never {},
    }
}

/// Decode character references (`&amp;`, `&hellip;`, `&#x2014;` ...) the
/// way a browser does for `textContent`. Unknown names are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
