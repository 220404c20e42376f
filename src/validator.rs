//! The validation orchestrator.
//!
//! [`ExtensionValidator::validate`] runs the pipeline in a fixed order and
//! stops at the first failure:
//!
//! 1. package intake (content type, archive safety, manifest lookup);
//! 2. manifest decoding (UTF-8, then JSON);
//! 3. the field validators, in the order of
//!    [`FIELD_VALIDATORS`](crate::fields::FIELD_VALIDATORS).
//!
//! The validator holds no state that changes between calls, so one instance
//! may validate any number of uploads.

use crate::archive::intake::{IntakeError, PackageIntake, UploadedPackage};
use crate::archive::safety::{ArchiveInspector, SafeUnzip};
use crate::config::ValidatorConfig;
use crate::error::{ErrorKey, ExtensionError, Result};
use crate::fields::FIELD_VALIDATORS;
use crate::manifest::decoder::validate_json;
use crate::manifest::value::ManifestDocument;
use crate::messages::MessageTable;
use log::{debug, warn};
use std::io::{Read, Seek};

/// Validates uploaded extension packages.
///
/// # Examples
///
/// ```
/// use extension_validator::archive::intake::UploadedPackage;
/// use extension_validator::config::ValidatorConfig;
/// use extension_validator::error::ErrorKey;
/// use extension_validator::messages::MessageTable;
/// use extension_validator::validator::ExtensionValidator;
///
/// let config = ValidatorConfig::default();
/// let validator = ExtensionValidator::new(&config, MessageTable::builtin());
///
/// let mut upload = UploadedPackage::from_bytes(Vec::new(), "text/plain", "ext.txt");
/// let error = validator.validate(&mut upload).expect_err("wrong content type");
/// assert_eq!(error.key(), Some(ErrorKey::BadContentType));
/// ```
#[derive(Clone, Debug)]
pub struct ExtensionValidator<'m, I = SafeUnzip> {
    intake: PackageIntake<I>,
    messages: &'m MessageTable,
}

impl<'m> ExtensionValidator<'m, SafeUnzip> {
    /// Create a validator using the `zip`-backed archive inspector.
    #[must_use]
    pub fn new(config: &ValidatorConfig, messages: &'m MessageTable) -> Self {
        Self::with_inspector(SafeUnzip::new(config.archive.clone()), config, messages)
    }
}

impl<'m, I: ArchiveInspector> ExtensionValidator<'m, I> {
    /// Create a validator that certifies archives with `inspector`.
    #[must_use]
    pub fn with_inspector(
        inspector: I,
        config: &ValidatorConfig,
        messages: &'m MessageTable,
    ) -> Self {
        let limits = &config.archive;
        Self {
            intake: PackageIntake::new(
                inspector,
                limits.max_upload_size,
                limits.max_uncompressed_size,
            ),
            messages,
        }
    }

    /// Validate `upload`, returning silently when it is accepted.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered. Keyed failures carry the
    /// message from this validator's [`MessageTable`]; unsafe or unreadable
    /// archives surface as [`ExtensionError::UnreadableArchive`].
    pub fn validate<R: Read + Seek>(&self, upload: &mut UploadedPackage<R>) -> Result<()> {
        self.validate_manifest(upload).map(drop)
    }

    /// Validate `upload` and hand back its decoded manifest.
    ///
    /// Runs exactly the same pipeline as [`Self::validate`].
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn validate_manifest<R: Read + Seek>(
        &self,
        upload: &mut UploadedPackage<R>,
    ) -> Result<ManifestDocument> {
        debug!("validating upload {}", upload.filename());

        let bytes = self
            .intake
            .validate_file(upload)
            .map_err(|error| self.intake_failure(upload.filename(), error))?;
        let document = validate_json(&bytes).map_err(|key| self.rejection(key))?;
        self.validate_fields(&document)?;

        debug!("upload {} accepted", upload.filename());
        Ok(document)
    }

    /// Run the field validators over an already decoded manifest.
    ///
    /// # Errors
    ///
    /// Returns the first field failure, in validator order.
    pub fn validate_fields(&self, document: &ManifestDocument) -> Result<()> {
        for (field, validator) in FIELD_VALIDATORS {
            validator(document).map_err(|key| self.rejection(key))?;
            debug!("field {field} passed");
        }
        Ok(())
    }

    fn rejection(&self, key: ErrorKey) -> ExtensionError {
        debug!("rejected with {key}");
        ExtensionError::Invalid(self.messages.error(key))
    }

    fn intake_failure(&self, filename: &str, error: IntakeError) -> ExtensionError {
        match error {
            IntakeError::Rejected(key) => self.rejection(key),
            IntakeError::Archive(reason) => {
                warn!("refusing archive {filename}: {reason}");
                ExtensionError::UnreadableArchive(reason)
            }
        }
    }
}
