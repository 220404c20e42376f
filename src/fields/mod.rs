//! Field validators for decoded manifests.
//!
//! Each validator reads only its own field and is free of side effects. The
//! orchestrator runs them in the order of [`FIELD_VALIDATORS`]; callers rely
//! on the first failure in that order being the one reported.
//!
//! # Sub-modules
//!
//! - [`name`]: Required display name.
//! - [`description`]: Optional short description.
//! - [`author`]: Optional author credit.
//! - [`version`]: Required dotted version string.
//! - [`icons`]: Optional icon set keyed by pixel size.

pub mod author;
pub mod description;
pub mod icons;
pub mod name;
pub mod version;

use crate::error::ErrorKey;
use crate::manifest::value::ManifestDocument;

pub use author::validate_author;
pub use description::validate_description;
pub use icons::validate_icons;
pub use name::validate_name;
pub use version::validate_version;

/// Signature shared by every field validator.
pub type FieldValidator = fn(&ManifestDocument) -> Result<(), ErrorKey>;

/// Field validators in the order the orchestrator runs them.
pub const FIELD_VALIDATORS: [(&str, FieldValidator); 5] = [
    ("name", validate_name),
    ("description", validate_description),
    ("author", validate_author),
    ("version", validate_version),
    ("icons", validate_icons),
];

/// Reject text that is empty once surrounding whitespace is removed.
fn require_non_blank(text: &str, too_short: ErrorKey) -> Result<(), ErrorKey> {
    if text.trim().is_empty() {
        return Err(too_short);
    }
    Ok(())
}

/// Reject text longer than `max` characters, counting the untrimmed value.
fn require_max_chars(text: &str, max: usize, too_long: ErrorKey) -> Result<(), ErrorKey> {
    if text.chars().count() > max {
        return Err(too_long);
    }
    Ok(())
}
