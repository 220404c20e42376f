//! The optional `icons` field.
//!
//! Icons map a pixel-size label to a path inside the archive. Whether the
//! referenced files exist, or contain PNG data, is not checked here.

use crate::error::ErrorKey;
use crate::manifest::value::{ManifestDocument, ManifestValue};

/// The icon size every non-empty icon set must provide.
pub const REQUIRED_ICON_SIZE: &str = "128";

/// The file extension every icon path must carry.
pub const ICON_EXTENSION: &str = ".png";

/// Validate the `icons` field, if present.
///
/// A missing, `null`, or empty icon set is valid. A non-empty set must
/// contain a [`REQUIRED_ICON_SIZE`] entry, and every path must end in
/// [`ICON_EXTENSION`].
///
/// # Errors
///
/// Returns `ICONS_NO_128` when the 128 pixel entry is missing and
/// `ICONS_INVALID_FORMAT` when the set is not a mapping or any path is not a
/// `.png` string.
pub fn validate_icons(document: &ManifestDocument) -> Result<(), ErrorKey> {
    let icons = match document.field("icons") {
        ManifestValue::Absent | ManifestValue::Null => return Ok(()),
        ManifestValue::Mapping(icons) => icons,
        _ => return Err(ErrorKey::IconsInvalidFormat),
    };
    if icons.is_empty() {
        return Ok(());
    }
    if !icons.contains_key(REQUIRED_ICON_SIZE) {
        return Err(ErrorKey::IconsNo128);
    }
    let all_png = icons
        .values()
        .all(|value| value.as_str().is_some_and(|path| path.ends_with(ICON_EXTENSION)));
    if !all_png {
        return Err(ErrorKey::IconsInvalidFormat);
    }
    Ok(())
}
