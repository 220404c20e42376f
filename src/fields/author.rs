//! The optional `author` field.

use super::{require_max_chars, require_non_blank};
use crate::error::ErrorKey;
use crate::manifest::value::{ManifestDocument, ManifestValue};

/// Longest permitted author credit, in characters.
pub const AUTHOR_MAX_LENGTH: usize = 128;

/// Validate the `author` field, if present.
///
/// An author that is present must be a non-blank string of at most
/// [`AUTHOR_MAX_LENGTH`] characters.
///
/// # Errors
///
/// Returns `AUTHOR_NOT_STRING`, `AUTHOR_TOO_SHORT`, or `AUTHOR_TOO_LONG`.
pub fn validate_author(document: &ManifestDocument) -> Result<(), ErrorKey> {
    let author = match document.field("author") {
        ManifestValue::Absent => return Ok(()),
        ManifestValue::String(author) => author,
        _ => return Err(ErrorKey::AuthorNotString),
    };
    require_non_blank(author, ErrorKey::AuthorTooShort)?;
    require_max_chars(author, AUTHOR_MAX_LENGTH, ErrorKey::AuthorTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn document(value: Value) -> ManifestDocument {
        ManifestDocument::try_from(value).expect("object")
    }

    #[rstest]
    #[case::absent(json!({}))]
    #[case::valid(json!({"author": "I am a famous aûthor"}))]
    #[case::maximum(json!({"author": "ŷ".repeat(AUTHOR_MAX_LENGTH)}))]
    fn accepts(#[case] manifest: Value) {
        assert!(validate_author(&document(manifest)).is_ok());
    }

    #[rstest]
    #[case::number(json!(42))]
    #[case::list(json!([]))]
    #[case::mapping(json!({}))]
    #[case::null(json!(null))]
    fn non_strings_are_rejected(#[case] author: Value) {
        assert_eq!(
            validate_author(&document(json!({ "author": author }))),
            Err(ErrorKey::AuthorNotString)
        );
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace_only("\n \t")]
    fn blank_authors_are_too_short(#[case] author: &str) {
        assert_eq!(
            validate_author(&document(json!({ "author": author }))),
            Err(ErrorKey::AuthorTooShort)
        );
    }

    #[test]
    fn rejects_one_character_over_the_maximum() {
        let author = "ŷ".repeat(AUTHOR_MAX_LENGTH + 1);
        assert_eq!(
            validate_author(&document(json!({ "author": author }))),
            Err(ErrorKey::AuthorTooLong)
        );
    }
}
