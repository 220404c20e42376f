//! The optional `description` field.

use super::require_max_chars;
use crate::error::ErrorKey;
use crate::manifest::value::{ManifestDocument, ManifestValue};

/// Longest permitted description, in characters.
pub const DESCRIPTION_MAX_LENGTH: usize = 133;

/// Validate the `description` field, if present.
///
/// # Errors
///
/// Returns `DESCRIPTION_NOT_STRING` or `DESCRIPTION_TOO_LONG`.
pub fn validate_description(document: &ManifestDocument) -> Result<(), ErrorKey> {
    match document.field("description") {
        ManifestValue::Absent => Ok(()),
        ManifestValue::String(description) => require_max_chars(
            description,
            DESCRIPTION_MAX_LENGTH,
            ErrorKey::DescriptionTooLong,
        ),
        _ => Err(ErrorKey::DescriptionNotString),
    }
}
