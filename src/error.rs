//! Error types for extension package validation.
//!
//! Every keyed rejection carries an [`ErrorKey`] drawn from a fixed,
//! case-sensitive enumeration. The key is the stable programmatic identifier;
//! the accompanying message is looked up from a
//! [`MessageTable`](crate::messages::MessageTable) and may be localised.
//!
//! Archive failures that cannot be attributed to a key (unsafe, corrupt, or
//! unreadable archives) surface as [`ExtensionError::UnreadableArchive`].

use crate::archive::safety::ArchiveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for a specific validation failure.
///
/// The serialised form of each variant is its uppercase identifier, e.g.
/// `NAME_MISSING`.
///
/// # Examples
///
/// ```
/// use extension_validator::error::ErrorKey;
///
/// let key: ErrorKey = "ICONS_NO_128".parse().expect("known key");
/// assert_eq!(key, ErrorKey::IconsNo128);
/// assert_eq!(key.to_string(), "ICONS_NO_128");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKey {
    /// The upload's declared content type is not a zip archive.
    BadContentType,
    /// The archive has no manifest entry.
    NoManifest,
    /// The manifest bytes are not valid UTF-8.
    InvalidJsonEncoding,
    /// The manifest text is not a well-formed JSON object.
    InvalidJson,
    /// The `name` field is absent.
    NameMissing,
    /// The `name` field is not a string.
    NameNotString,
    /// The `name` field is empty or whitespace only.
    NameTooShort,
    /// The `name` field exceeds the maximum length.
    NameTooLong,
    /// The `description` field is not a string.
    DescriptionNotString,
    /// The `description` field exceeds the maximum length.
    DescriptionTooLong,
    /// The `author` field is not a string.
    AuthorNotString,
    /// The `author` field is empty or whitespace only.
    AuthorTooShort,
    /// The `author` field exceeds the maximum length.
    AuthorTooLong,
    /// The `version` field is absent.
    VersionMissing,
    /// The `version` field is not a string.
    VersionNotString,
    /// The `version` field does not follow the dotted-number grammar.
    VersionInvalid,
    /// A non-empty `icons` set lacks the 128 pixel entry.
    #[serde(rename = "ICONS_NO_128")]
    IconsNo128,
    /// An `icons` entry is not a PNG file path.
    IconsInvalidFormat,
}

impl ErrorKey {
    /// Every key, in published order.
    pub const ALL: [Self; 18] = [
        Self::BadContentType,
        Self::NoManifest,
        Self::InvalidJsonEncoding,
        Self::InvalidJson,
        Self::NameMissing,
        Self::NameNotString,
        Self::NameTooShort,
        Self::NameTooLong,
        Self::DescriptionNotString,
        Self::DescriptionTooLong,
        Self::AuthorNotString,
        Self::AuthorTooShort,
        Self::AuthorTooLong,
        Self::VersionMissing,
        Self::VersionNotString,
        Self::VersionInvalid,
        Self::IconsNo128,
        Self::IconsInvalidFormat,
    ];

    /// Return the identifier exactly as published.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadContentType => "BAD_CONTENT_TYPE",
            Self::NoManifest => "NO_MANIFEST",
            Self::InvalidJsonEncoding => "INVALID_JSON_ENCODING",
            Self::InvalidJson => "INVALID_JSON",
            Self::NameMissing => "NAME_MISSING",
            Self::NameNotString => "NAME_NOT_STRING",
            Self::NameTooShort => "NAME_TOO_SHORT",
            Self::NameTooLong => "NAME_TOO_LONG",
            Self::DescriptionNotString => "DESCRIPTION_NOT_STRING",
            Self::DescriptionTooLong => "DESCRIPTION_TOO_LONG",
            Self::AuthorNotString => "AUTHOR_NOT_STRING",
            Self::AuthorTooShort => "AUTHOR_TOO_SHORT",
            Self::AuthorTooLong => "AUTHOR_TOO_LONG",
            Self::VersionMissing => "VERSION_MISSING",
            Self::VersionNotString => "VERSION_NOT_STRING",
            Self::VersionInvalid => "VERSION_INVALID",
            Self::IconsNo128 => "ICONS_NO_128",
            Self::IconsInvalidFormat => "ICONS_INVALID_FORMAT",
        }
    }

    /// Return the built-in English message for this key.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadContentType => "The file sent has an unsupported content-type.",
            Self::NoManifest => "The archive does not contain a 'manifest.json' file.",
            Self::InvalidJsonEncoding => "'manifest.json' in the archive is not encoded in UTF-8.",
            Self::InvalidJson => "'manifest.json' in the archive is not a valid JSON object.",
            Self::NameMissing => "There is no `name` property in the manifest.",
            Self::NameNotString => "The `name` property must be a string.",
            Self::NameTooShort => {
                "The `name` property must be at least 1 character long and can not consist of only whitespace characters."
            }
            Self::NameTooLong => "The `name` property cannot be longer than 45 characters.",
            Self::DescriptionNotString => "The `description` property must be a string.",
            Self::DescriptionTooLong => {
                "The `description` property cannot be longer than 133 characters."
            }
            Self::AuthorNotString => "The `author` property must be a string.",
            Self::AuthorTooShort => {
                "The `author` property must be at least 1 character long and can not consist of only whitespace characters."
            }
            Self::AuthorTooLong => "The `author` property cannot be longer than 128 characters.",
            Self::VersionMissing => "There is no `version` property in the manifest.",
            Self::VersionNotString => "The `version` property must be a string.",
            Self::VersionInvalid => {
                "The `version` property must be a string consisting of at most 4 dot-separated numbers, each between 0 and 65535 with no leading zeros."
            }
            Self::IconsNo128 => "If defining `icons`, you must include a 128x128 variant.",
            Self::IconsInvalidFormat => "Icons must be PNG files with a `.png` extension.",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a string that is not a published [`ErrorKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error key \"{value}\"")]
pub struct UnknownErrorKey {
    /// The rejected identifier.
    pub value: String,
}

impl FromStr for ErrorKey {
    type Err = UnknownErrorKey;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UnknownErrorKey {
                value: value.to_owned(),
            })
    }
}

/// A keyed validation failure with its human-readable message.
///
/// Serialises to the `{"key": ..., "message": ...}` payload handed to the
/// web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{key}: {message}")]
pub struct ValidationError {
    key: ErrorKey,
    message: String,
}

impl ValidationError {
    /// Build an error from a key and the message resolved for it.
    #[must_use]
    pub fn new(key: ErrorKey, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }

    /// Return the stable error key.
    #[must_use]
    pub const fn key(&self) -> ErrorKey {
        self.key
    }

    /// Return the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Generic message reported for archives that cannot be safely read.
pub const UNREADABLE_ARCHIVE_MESSAGE: &str = "The uploaded file is not a valid or safe zip archive.";

/// Outcome of a rejected validation run.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// A keyed rejection.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The archive is unsafe, corrupt, or unreadable.
    ///
    /// The inner reason is kept for logging; callers should treat every
    /// instance alike.
    #[error("the uploaded file is not a valid or safe zip archive")]
    UnreadableArchive(#[source] ArchiveError),
}

impl ExtensionError {
    /// Return the error key, or `None` for the generic archive failure.
    #[must_use]
    pub fn key(&self) -> Option<ErrorKey> {
        match self {
            Self::Invalid(error) => Some(error.key()),
            Self::UnreadableArchive(_) => None,
        }
    }

    /// Return the message shown to the uploader.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Invalid(error) => error.message(),
            Self::UnreadableArchive(_) => UNREADABLE_ARCHIVE_MESSAGE,
        }
    }
}

/// Result type alias using [`ExtensionError`].
pub type Result<T> = std::result::Result<T, ExtensionError>;
