//! Text escaping for markup and for the data attributes of removal controls.

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("attribute {value:?} is not valid percent-encoded UTF-8")]
pub struct DecodeError {
    pub value: String,
}

/// Escapes `& < > " '` so the result is inert both as element text and inside
/// a double- or single-quoted attribute.
pub fn escape_html(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Percent-encodes everything outside `A-Z a-z 0-9 - _ . ~`.
pub fn encode_component(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

pub fn decode_component(encoded: &str) -> Result<String, DecodeError> {
    urlencoding::decode(encoded)
        .map(Cow::into_owned)
        .map_err(|_| DecodeError {
            value: encoded.to_string(),
        })
}
