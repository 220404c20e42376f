//! Manifest decoding: UTF-8 first, then JSON.
//!
//! Encoding and syntax failures are reported under distinct keys. A byte
//! sequence that is not UTF-8 is never reported as a syntax error.
//!
//! Numbers keep their textual form, so out-of-range literals such as `1e400`
//! are well-formed. A `\u` escape naming an unpaired surrogate decodes to
//! U+FFFD, since Rust strings cannot hold the surrogate itself.

use super::value::ManifestDocument;
use crate::error::ErrorKey;
use log::debug;
use std::borrow::Cow;

/// Length of a `\uXXXX` escape.
const UNICODE_ESCAPE_LEN: usize = 6;

/// Escape substituted for an unpaired surrogate.
const REPLACEMENT_ESCAPE: &str = "\\ufffd";

/// Decode raw manifest bytes into a [`ManifestDocument`].
///
/// No normalisation takes place: keys and values are passed on exactly as
/// written, apart from unpaired surrogate escapes.
///
/// # Errors
///
/// Returns [`ErrorKey::InvalidJsonEncoding`] when `bytes` is not valid UTF-8
/// and [`ErrorKey::InvalidJson`] when the text is not a JSON object.
///
/// # Examples
///
/// ```
/// use extension_validator::error::ErrorKey;
/// use extension_validator::manifest::decoder::validate_json;
///
/// let document = validate_json(br#"{"version": "1.0"}"#).expect("valid manifest");
/// assert_eq!(document.field("version").as_str(), Some("1.0"));
///
/// assert_eq!(validate_json(b"{\"name\": \"\x81\"}"), Err(ErrorKey::InvalidJsonEncoding));
/// assert_eq!(validate_json(b"not json"), Err(ErrorKey::InvalidJson));
/// ```
pub fn validate_json(bytes: &[u8]) -> Result<ManifestDocument, ErrorKey> {
    let text = std::str::from_utf8(bytes).map_err(|error| {
        debug!("manifest is not UTF-8: {error}");
        ErrorKey::InvalidJsonEncoding
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&replace_lone_surrogates(text)).map_err(|error| {
            debug!("manifest is not JSON: {error}");
            ErrorKey::InvalidJson
        })?;

    ManifestDocument::try_from(value).map_err(|error| {
        debug!("{error}");
        ErrorKey::InvalidJson
    })
}

/// Rewrite `\u` escapes of unpaired surrogates inside string literals.
///
/// Escapes outside strings are left alone for the parser to reject.
fn replace_lone_surrogates(text: &str) -> Cow<'_, str> {
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut rewritten = String::new();
    let mut copied = 0;
    let mut index = 0;
    let mut in_string = false;

    while let Some(&byte) = bytes.get(index) {
        if !in_string {
            in_string = byte == b'"';
            index += 1;
            continue;
        }
        match byte {
            b'"' => {
                in_string = false;
                index += 1;
            }
            b'\\' => match escaped_unit(text, index) {
                Some(unit) if is_high_surrogate(unit) => {
                    let next = index + UNICODE_ESCAPE_LEN;
                    if escaped_unit(text, next).is_some_and(is_low_surrogate) {
                        index = next + UNICODE_ESCAPE_LEN;
                    } else {
                        rewritten.push_str(text.get(copied..index).unwrap_or_default());
                        rewritten.push_str(REPLACEMENT_ESCAPE);
                        index = next;
                        copied = index;
                    }
                }
                Some(unit) if is_low_surrogate(unit) => {
                    rewritten.push_str(text.get(copied..index).unwrap_or_default());
                    rewritten.push_str(REPLACEMENT_ESCAPE);
                    index += UNICODE_ESCAPE_LEN;
                    copied = index;
                }
                Some(_) => index += UNICODE_ESCAPE_LEN,
                None => index += 2,
            },
            _ => index += 1,
        }
    }

    if copied == 0 {
        return Cow::Borrowed(text);
    }
    rewritten.push_str(text.get(copied..).unwrap_or_default());
    Cow::Owned(rewritten)
}

/// Return the code unit of a `\uXXXX` escape starting at `at`.
fn escaped_unit(text: &str, at: usize) -> Option<u16> {
    let hex = text.get(at..at + UNICODE_ESCAPE_LEN)?.strip_prefix("\\u")?;
    if !hex.bytes().all(|digit| digit.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

const fn is_high_surrogate(unit: u16) -> bool {
    matches!(unit, 0xD800..=0xDBFF)
}

const fn is_low_surrogate(unit: u16) -> bool {
    matches!(unit, 0xDC00..=0xDFFF)
}
