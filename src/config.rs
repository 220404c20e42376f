//! Validator configuration loaded from TOML.
//!
//! Deployments keep archive limits and optional message overrides in a
//! single TOML document. Every section is optional and falls back to the
//! defaults below, so an empty file is a valid configuration:
//!
//! ```toml
//! [archive]
//! max_uncompressed_size = 52428800
//! max_compression_ratio = 50
//!
//! [messages]
//! NAME_MISSING = "Le manifeste ne contient pas de propriété `name`."
//! ```

use crate::error::ErrorKey;
use crate::messages::MessageTable;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration at {path}")]
    Read {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML or has unknown fields.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level validator configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Limits applied by the archive safety checker.
    pub archive: ArchiveLimits,
    /// Per-key replacements for the built-in messages.
    pub messages: BTreeMap<ErrorKey, String>,
}

impl ValidatorConfig {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML, unknown fields, or
    /// unknown message keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use extension_validator::config::ValidatorConfig;
    ///
    /// let config = ValidatorConfig::from_toml("[archive]\nmax_entries = 50\n")
    ///     .expect("valid configuration");
    /// assert_eq!(config.archive.max_entries, 50);
    /// assert_eq!(config.archive.max_compression_ratio, 100);
    /// ```
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            source: error,
        })?;
        Self::from_toml(&text)
    }

    /// Build the message table described by this configuration.
    #[must_use]
    pub fn message_table(&self) -> MessageTable {
        MessageTable::with_overrides(&self.messages)
    }
}

/// Thresholds guarding against oversized and decompression-bomb archives.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveLimits {
    /// Largest upload, in bytes, read into memory.
    pub max_upload_size: u64,
    /// Largest summed uncompressed size, in bytes, across all entries.
    pub max_uncompressed_size: u64,
    /// Largest permitted uncompressed-to-compressed ratio for one entry.
    pub max_compression_ratio: u64,
    /// Entries whose uncompressed size is at or below this many bytes are
    /// exempt from the ratio check.
    pub ratio_floor: u64,
    /// Largest number of entries in the central directory.
    pub max_entries: usize,
}

impl ArchiveLimits {
    const fn default_max_upload_size() -> u64 {
        100 * MIB
    }

    const fn default_max_uncompressed_size() -> u64 {
        100 * MIB
    }

    const fn default_max_compression_ratio() -> u64 {
        100
    }

    const fn default_ratio_floor() -> u64 {
        MIB
    }

    const fn default_max_entries() -> usize {
        10_000
    }
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self {
            max_upload_size: Self::default_max_upload_size(),
            max_uncompressed_size: Self::default_max_uncompressed_size(),
            max_compression_ratio: Self::default_max_compression_ratio(),
            ratio_floor: Self::default_ratio_floor(),
            max_entries: Self::default_max_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    fn defaults_match_the_documented_limits() {
        let config = ValidatorConfig::default();

        assert_eq!(config.archive.max_upload_size, 100 * MIB);
        assert_eq!(config.archive.max_uncompressed_size, 100 * MIB);
        assert_eq!(config.archive.max_compression_ratio, 100);
        assert_eq!(config.archive.ratio_floor, MIB);
        assert_eq!(config.archive.max_entries, 10_000);
        assert!(config.messages.is_empty());
    }

    #[rstest]
    fn empty_document_is_the_default() {
        let config = ValidatorConfig::from_toml("").expect("empty configuration parses");
        assert_eq!(config, ValidatorConfig::default());
    }

    #[rstest]
    fn deserialises_archive_overrides() {
        let source = "[archive]\nmax_uncompressed_size = 2048\nmax_compression_ratio = 10\n";

        // Panic with the TOML parser's message so broken overrides are easy to debug.
        let config = ValidatorConfig::from_toml(source)
            .expect("expected configuration to parse successfully");

        assert_eq!(config.archive.max_uncompressed_size, 2048);
        assert_eq!(config.archive.max_compression_ratio, 10);
        assert_eq!(config.archive.max_entries, 10_000);
    }

    #[rstest]
    fn deserialises_message_overrides() {
        let source = "[messages]\nICONS_NO_128 = \"Need a 128px icon.\"\n";

        let config = ValidatorConfig::from_toml(source)
            .expect("expected configuration to parse successfully");

        assert_eq!(
            config.message_table().message(ErrorKey::IconsNo128),
            "Need a 128px icon."
        );
    }

    #[rstest]
    #[case::unknown_top_level("unexpected = true\n")]
    #[case::unknown_archive_field("[archive]\nmax_files = 3\n")]
    #[case::unknown_message_key("[messages]\nNAME_UNKNOWN = \"x\"\n")]
    #[case::non_numeric_limit("[archive]\nmax_entries = \"many\"\n")]
    fn rejects_invalid_documents(#[case] source: &str) {
        let outcome = ValidatorConfig::from_toml(source);
        assert!(
            matches!(outcome, Err(ConfigError::Parse(_))),
            "expected a parse error for {source:?}"
        );
    }

    #[rstest]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[archive]\nmax_entries = 7").expect("write config");
        let path = Utf8Path::from_path(file.path()).expect("utf-8 temp path");

        let config = ValidatorConfig::load(path).expect("load configuration");

        assert_eq!(config.archive.max_entries, 7);
    }

    #[rstest]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = Utf8PathBuf::from_path_buf(dir.path().join("absent.toml"))
            .expect("utf-8 temp path");

        let outcome = ValidatorConfig::load(&missing);

        assert!(matches!(outcome, Err(ConfigError::Read { path, .. }) if path == missing));
    }
}
