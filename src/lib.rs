//! Validation of uploaded browser-extension packages.
//!
//! A package is a zip archive carrying a `manifest.json` at its root. The
//! [`ExtensionValidator`] checks the declared content type, certifies the
//! archive as safe to read, decodes the manifest, and validates the `name`,
//! `description`, `author`, `version`, and `icons` fields. The first failure
//! is reported as an [`ExtensionError`] carrying a stable [`ErrorKey`] and a
//! human-readable message.

pub mod archive;
pub mod config;
pub mod error;
pub mod fields;
pub mod manifest;
pub mod messages;
pub mod validator;

pub use archive::intake::UploadedPackage;
pub use config::{ArchiveLimits, ConfigError, ValidatorConfig};
pub use error::{ErrorKey, ExtensionError, ValidationError};
pub use messages::MessageTable;
pub use validator::ExtensionValidator;
