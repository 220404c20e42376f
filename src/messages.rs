//! Immutable mapping from [`ErrorKey`] to human-readable message.
//!
//! The built-in table is assembled once per process and never mutated.
//! Deployments that localise or reword messages build their own table from
//! configuration with [`MessageTable::with_overrides`] and hand it to the
//! validator by reference.

use crate::error::{ErrorKey, ValidationError};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILTIN: Lazy<MessageTable> = Lazy::new(MessageTable::defaults);

/// Message lookup table covering every [`ErrorKey`].
///
/// # Examples
///
/// ```
/// use extension_validator::error::ErrorKey;
/// use extension_validator::messages::MessageTable;
///
/// let table = MessageTable::builtin();
/// let error = table.error(ErrorKey::NameMissing);
/// assert_eq!(error.key(), ErrorKey::NameMissing);
/// assert_eq!(error.message(), ErrorKey::NameMissing.default_message());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageTable {
    messages: BTreeMap<ErrorKey, String>,
}

impl MessageTable {
    /// Return the process-wide built-in table.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Build a table from the built-in messages, replacing the entries named
    /// in `overrides`.
    ///
    /// Blank overrides are ignored so a templated configuration cannot erase
    /// a message.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<ErrorKey, String>) -> Self {
        let mut table = Self::defaults();
        for (key, message) in overrides {
            if message.trim().is_empty() {
                continue;
            }
            table.messages.insert(*key, message.clone());
        }
        table
    }

    /// Return the message for `key`.
    #[must_use]
    pub fn message(&self, key: ErrorKey) -> &str {
        self.messages
            .get(&key)
            .map_or_else(|| key.default_message(), String::as_str)
    }

    /// Build the [`ValidationError`] for `key`.
    #[must_use]
    pub fn error(&self, key: ErrorKey) -> ValidationError {
        ValidationError::new(key, self.message(key))
    }

    fn defaults() -> Self {
        let messages = ErrorKey::ALL
            .into_iter()
            .map(|key| (key, key.default_message().to_owned()))
            .collect();
        Self { messages }
    }
}

impl Default for MessageTable {
    fn default() -> Self {
        Self::defaults()
    }
}
