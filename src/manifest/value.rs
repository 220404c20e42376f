//! Manifest document model.
//!
//! A manifest field may hold any JSON value, or be missing entirely. Field
//! validators pattern-match on [`ManifestValue`] and reject every variant
//! they do not accept.

use serde_json::Value;
use std::collections::BTreeMap;

static ABSENT: ManifestValue = ManifestValue::Absent;

/// One value read from a manifest.
#[derive(Clone, Debug, PartialEq)]
pub enum ManifestValue {
    /// The field is not present in the document.
    Absent,
    /// An explicit JSON `null`.
    Null,
    /// A JSON boolean.
    Boolean(bool),
    /// A JSON number.
    Number(serde_json::Number),
    /// A JSON string.
    String(String),
    /// A JSON array.
    Sequence(Vec<ManifestValue>),
    /// A JSON object.
    Mapping(BTreeMap<String, ManifestValue>),
}

impl ManifestValue {
    /// Return the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the field is missing from the document.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Value> for ManifestValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Boolean(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// A decoded manifest: the top-level JSON object.
///
/// # Examples
///
/// ```
/// use extension_validator::manifest::value::{ManifestDocument, ManifestValue};
///
/// let document = ManifestDocument::try_from(serde_json::json!({"name": "Ext"}))
///     .expect("object at top level");
/// assert_eq!(document.field("name").as_str(), Some("Ext"));
/// assert!(document.field("version").is_absent());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManifestDocument {
    fields: BTreeMap<String, ManifestValue>,
}

impl ManifestDocument {
    /// Return the value stored under `name`, or [`ManifestValue::Absent`].
    #[must_use]
    pub fn field(&self, name: &str) -> &ManifestValue {
        self.fields.get(name).unwrap_or(&ABSENT)
    }

    /// Iterate over the fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Returned when a JSON value is not an object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("manifest must be a JSON object at the top level")]
pub struct NotAnObject;

impl TryFrom<Value> for ManifestDocument {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match ManifestValue::from(value) {
            ManifestValue::Mapping(fields) => Ok(Self { fields }),
            _ => Err(NotAnObject),
        }
    }
}
