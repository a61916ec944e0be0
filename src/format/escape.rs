//! Entity escaping for serialized output.

use memchr::{memchr2, memchr3};
use std::borrow::Cow;
use std::fmt::Write;

/// Escape `text` for emission into an XML document.
///
/// Printable ASCII (`0x20..=0x7f`) plus tab, LF and CR pass through
/// unchanged; every other scalar becomes a hex numeric character reference.
/// The five predefined entities (`&`, `<`, `>`, `'`, `"`) are replaced only
/// when `escape_predefined` is set: XML requires them escaped in text and
/// attribute values but leaves them verbatim inside comments, CDATA and
/// processing-instruction data.
///
/// Borrows the input when nothing needs escaping, which is the common case
/// for element content.
pub(crate) fn escape(text: &str, escape_predefined: bool) -> Cow<'_, str> {
    if !needs_escape(text, escape_predefined) {
        return Cow::Borrowed(text);
    }

    let mut output = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' if escape_predefined => output.push_str("&amp;"),
            '<' if escape_predefined => output.push_str("&lt;"),
            '>' if escape_predefined => output.push_str("&gt;"),
            '\'' if escape_predefined => output.push_str("&apos;"),
            '"' if escape_predefined => output.push_str("&quot;"),
            '\t' | '\n' | '\r' => output.push(ch),
            ch if (' '..='\u{7f}').contains(&ch) => output.push(ch),
            ch => {
                let _ = write!(output, "&#x{:x};", ch as u32);
            }
        }
    }
    Cow::Owned(output)
}

/// Single fast scan deciding whether [`escape`] must allocate.
fn needs_escape(text: &str, escape_predefined: bool) -> bool {
    if !text.is_ascii() {
        return true;
    }
    let bytes = text.as_bytes();
    if bytes
        .iter()
        .any(|&b| b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
    {
        return true;
    }
    escape_predefined
        && (memchr3(b'&', b'<', b'>', bytes).is_some() || memchr2(b'\'', b'"', bytes).is_some())
}
