//! The required `version` field and its dotted-number grammar.
//!
//! A version is one to four dot-separated segments. Each segment is a run of
//! ASCII digits with no sign and no leading zero (the literal `0` excepted),
//! whose value lies in `0..=65535`.

use crate::error::ErrorKey;
use crate::manifest::value::{ManifestDocument, ManifestValue};
use std::fmt;

/// Most segments a version may have.
pub const MAX_SEGMENTS: usize = 4;

/// Most digits a segment may have; `65535` has five.
const MAX_SEGMENT_DIGITS: usize = 5;

/// A validated extension version.
///
/// # Examples
///
/// ```
/// use extension_validator::fields::version::ExtensionVersion;
///
/// let version = ExtensionVersion::try_from("0.42.42.42").expect("valid version");
/// assert_eq!(version.segments(), &[0, 42, 42, 42]);
/// assert!(ExtensionVersion::try_from("0.42.042.42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionVersion {
    segments: Vec<u16>,
}

impl ExtensionVersion {
    /// Return the numeric segments.
    #[must_use]
    pub fn segments(&self) -> &[u16] {
        &self.segments
    }
}

impl TryFrom<&str> for ExtensionVersion {
    type Error = ErrorKey;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let segments = value
            .split('.')
            .map(parse_segment)
            .collect::<Option<Vec<u16>>>()
            .ok_or(ErrorKey::VersionInvalid)?;
        if segments.len() > MAX_SEGMENTS {
            return Err(ErrorKey::VersionInvalid);
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for ExtensionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parse one segment, or `None` when it breaks the grammar.
fn parse_segment(segment: &str) -> Option<u16> {
    if segment.is_empty() || segment.len() > MAX_SEGMENT_DIGITS {
        return None;
    }
    if !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

/// Validate the `version` field.
///
/// # Errors
///
/// Returns `VERSION_MISSING`, `VERSION_NOT_STRING`, or `VERSION_INVALID`.
pub fn validate_version(document: &ManifestDocument) -> Result<(), ErrorKey> {
    match document.field("version") {
        ManifestValue::Absent => Err(ErrorKey::VersionMissing),
        ManifestValue::String(version) => ExtensionVersion::try_from(version.as_str()).map(drop),
        _ => Err(ErrorKey::VersionNotString),
    }
}
