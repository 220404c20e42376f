//! The required `name` field.

use super::{require_max_chars, require_non_blank};
use crate::error::ErrorKey;
use crate::manifest::value::{ManifestDocument, ManifestValue};

/// Longest permitted name, in characters.
pub const NAME_MAX_LENGTH: usize = 45;

/// Validate the `name` field.
///
/// The name must be present, be a string, contain something other than
/// whitespace, and be at most [`NAME_MAX_LENGTH`] characters long including
/// any surrounding whitespace.
///
/// # Errors
///
/// Returns `NAME_MISSING`, `NAME_NOT_STRING`, `NAME_TOO_SHORT`, or
/// `NAME_TOO_LONG`.
pub fn validate_name(document: &ManifestDocument) -> Result<(), ErrorKey> {
    let name = match document.field("name") {
        ManifestValue::Absent => return Err(ErrorKey::NameMissing),
        ManifestValue::String(name) => name,
        _ => return Err(ErrorKey::NameNotString),
    };
    require_non_blank(name, ErrorKey::NameTooShort)?;
    require_max_chars(name, NAME_MAX_LENGTH, ErrorKey::NameTooLong)
}
