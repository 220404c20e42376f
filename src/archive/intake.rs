//! Package intake: content-type check, archive certification, and manifest
//! extraction.
//!
//! Intake reads the upload into memory once, with a bound, and works on that
//! buffer from then on. Nothing is extracted to disk.

use super::safety::{ArchiveError, ArchiveInspector};
use crate::error::ErrorKey;
use log::debug;
use std::io::{Cursor, Read, Seek, SeekFrom};
use zip::ZipArchive;
use zip::result::ZipError;

/// The only archive entry intake looks for.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// The content type an upload must declare.
pub const EXPECTED_CONTENT_TYPE: &str = "application/zip";

/// An uploaded package as handed over by the upload-handling layer.
///
/// The validator borrows the package for the duration of one call and
/// never retains it. The archive is taken to start wherever the stream is
/// positioned when it is first validated.
#[derive(Debug)]
pub struct UploadedPackage<R> {
    reader: R,
    content_type: String,
    filename: String,
    origin: Option<u64>,
}

impl<R> UploadedPackage<R> {
    /// Wrap `reader` with the metadata declared by the uploader.
    #[must_use]
    pub fn new(reader: R, content_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            reader,
            content_type: content_type.into(),
            filename: filename.into(),
            origin: None,
        }
    }

    /// Return the declared content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Return the filename supplied by the uploader.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl UploadedPackage<Cursor<Vec<u8>>> {
    /// Build a package over an in-memory buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use extension_validator::archive::intake::UploadedPackage;
    ///
    /// let upload = UploadedPackage::from_bytes(vec![0x50, 0x4b], "application/zip", "ext.zip");
    /// assert_eq!(upload.content_type(), "application/zip");
    /// assert_eq!(upload.filename(), "ext.zip");
    /// ```
    #[must_use]
    pub fn from_bytes(
        bytes: Vec<u8>,
        content_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self::new(Cursor::new(bytes), content_type, filename)
    }
}

/// Failures raised by [`PackageIntake::validate_file`].
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// A keyed rejection (`BAD_CONTENT_TYPE` or `NO_MANIFEST`).
    #[error("package rejected: {0}")]
    Rejected(ErrorKey),

    /// The archive is unsafe, corrupt, or unreadable.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl From<ErrorKey> for IntakeError {
    fn from(key: ErrorKey) -> Self {
        Self::Rejected(key)
    }
}

/// The package intake stage.
#[derive(Clone, Debug)]
pub struct PackageIntake<I> {
    inspector: I,
    max_upload_size: u64,
    max_manifest_size: u64,
}

impl<I: ArchiveInspector> PackageIntake<I> {
    /// Create an intake stage that certifies archives with `inspector`.
    ///
    /// `max_upload_size` bounds the bytes read from the upload and
    /// `max_manifest_size` bounds the bytes read from the manifest entry.
    #[must_use]
    pub const fn new(inspector: I, max_upload_size: u64, max_manifest_size: u64) -> Self {
        Self {
            inspector,
            max_upload_size,
            max_manifest_size,
        }
    }

    /// Check the upload and return the raw bytes of its manifest entry.
    ///
    /// The content type is checked before the stream is touched. The stream
    /// is rewound to where it stood on the first call, so repeated calls
    /// observe the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Rejected`] with [`ErrorKey::BadContentType`] on
    /// a content-type mismatch and [`ErrorKey::NoManifest`] when the archive
    /// has no manifest entry. Every archive safety, I/O, or structural
    /// failure, including a manifest that inflates past its bound, is
    /// returned as [`IntakeError::Archive`].
    pub fn validate_file<R: Read + Seek>(
        &self,
        upload: &mut UploadedPackage<R>,
    ) -> Result<Vec<u8>, IntakeError> {
        if upload.content_type != EXPECTED_CONTENT_TYPE {
            debug!(
                "upload {} declared content type {:?}",
                upload.filename, upload.content_type
            );
            return Err(ErrorKey::BadContentType.into());
        }

        let archive = self.read_upload(upload)?;
        self.inspector.inspect(&archive)?;
        self.read_manifest(&archive)
    }

    fn read_upload<R: Read + Seek>(
        &self,
        upload: &mut UploadedPackage<R>,
    ) -> Result<Vec<u8>, ArchiveError> {
        let origin = match upload.origin {
            Some(position) => position,
            None => {
                let position = upload.reader.stream_position()?;
                upload.origin = Some(position);
                position
            }
        };
        upload.reader.seek(SeekFrom::Start(origin))?;
        let mut buffer = Vec::new();
        upload
            .reader
            .by_ref()
            .take(self.max_upload_size.saturating_add(1))
            .read_to_end(&mut buffer)?;
        if !u64::try_from(buffer.len()).is_ok_and(|len| len <= self.max_upload_size) {
            return Err(ArchiveError::UploadTooLarge {
                limit: self.max_upload_size,
            });
        }
        Ok(buffer)
    }

    fn read_manifest(&self, archive: &[u8]) -> Result<Vec<u8>, IntakeError> {
        let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(ArchiveError::from)?;
        let entry = match zip.by_name(MANIFEST_FILENAME) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(ErrorKey::NoManifest.into()),
            Err(other) => return Err(ArchiveError::from(other).into()),
        };

        let mut manifest = Vec::new();
        entry
            .take(self.max_manifest_size.saturating_add(1))
            .read_to_end(&mut manifest)
            .map_err(ArchiveError::from)?;
        if !u64::try_from(manifest.len()).is_ok_and(|len| len <= self.max_manifest_size) {
            return Err(ArchiveError::ManifestTooLarge {
                limit: self.max_manifest_size,
            }
            .into());
        }
        debug!("read {} manifest bytes", manifest.len());
        Ok(manifest)
    }
}
