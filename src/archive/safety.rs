//! Archive safety inspection for uploaded packages.
//!
//! Certifies that a zip archive can be read without path traversal or
//! decompression-bomb resource exhaustion. Inspection walks the central
//! directory only; no entry is decompressed or written anywhere.

use crate::config::ArchiveLimits;
use log::debug;
use std::io::Cursor;
use zip::ZipArchive;
use zip::result::ZipError;

/// File type bits of a unix mode.
const S_IFMT: u32 = 0o170_000;

/// File type bits of a symbolic link.
const S_IFLNK: u32 = 0o120_000;

/// Trait for certifying archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use extension_validator::archive::safety::{ArchiveInspector, SafeUnzip};
/// use extension_validator::config::ArchiveLimits;
///
/// let inspector = SafeUnzip::new(ArchiveLimits::default());
/// assert!(inspector.inspect(b"not a zip archive").is_err());
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveInspector {
    /// Inspect the archive held in `archive`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArchiveError`] describing the first unsafe property
    /// found, or the structural failure that prevented inspection.
    fn inspect(&self, archive: &[u8]) -> Result<(), ArchiveError>;
}

/// Reasons an archive is refused.
///
/// Callers outside this crate see every variant collapsed into one generic
/// failure; the distinction exists for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The central directory could not be parsed.
    #[error("malformed zip archive: {0}")]
    Malformed(#[from] ZipError),

    /// Reading the upload or an entry failed.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload is larger than the configured limit.
    #[error("upload exceeds {limit} bytes")]
    UploadTooLarge {
        /// The configured limit in bytes.
        limit: u64,
    },

    /// The manifest entry inflates past the configured limit.
    #[error("manifest entry exceeds {limit} bytes")]
    ManifestTooLarge {
        /// The configured limit in bytes.
        limit: u64,
    },

    /// An entry path escapes the extraction root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: String,
    },

    /// An entry is a symbolic link.
    #[error("symlink entry: {path}")]
    SymlinkEntry {
        /// The offending entry name.
        path: String,
    },

    /// The archive holds more entries than permitted.
    #[error("archive has {count} entries; limit is {limit}")]
    TooManyEntries {
        /// Number of entries in the central directory.
        count: usize,
        /// The configured limit.
        limit: usize,
    },

    /// The summed uncompressed size exceeds the limit.
    #[error("archive expands to more than {limit} bytes")]
    UncompressedSizeExceeded {
        /// The configured limit in bytes.
        limit: u64,
    },

    /// An entry compresses suspiciously well.
    #[error("entry {path} has compression ratio {ratio}; limit is {limit}")]
    CompressionRatioExceeded {
        /// The offending entry name.
        path: String,
        /// Observed uncompressed-to-compressed ratio.
        ratio: u64,
        /// The configured limit.
        limit: u64,
    },
}

/// Default inspector backed by the `zip` crate.
#[derive(Clone, Debug, Default)]
pub struct SafeUnzip {
    limits: ArchiveLimits,
}

impl SafeUnzip {
    /// Create an inspector enforcing `limits`.
    #[must_use]
    pub const fn new(limits: ArchiveLimits) -> Self {
        Self { limits }
    }
}

impl ArchiveInspector for SafeUnzip {
    fn inspect(&self, archive: &[u8]) -> Result<(), ArchiveError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))?;

        let count = zip.len();
        if count > self.limits.max_entries {
            return Err(ArchiveError::TooManyEntries {
                count,
                limit: self.limits.max_entries,
            });
        }

        let mut total_size: u64 = 0;
        for index in 0..count {
            // Raw access reads the header without decompressing the entry.
            let entry = zip.by_index_raw(index)?;
            let name = entry.name().to_owned();

            validate_entry_name(&name)?;

            if entry.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
                return Err(ArchiveError::SymlinkEntry { path: name });
            }

            let size = entry.size();
            total_size = total_size.saturating_add(size);
            if total_size > self.limits.max_uncompressed_size {
                return Err(ArchiveError::UncompressedSizeExceeded {
                    limit: self.limits.max_uncompressed_size,
                });
            }

            if size > self.limits.ratio_floor {
                let ratio = size
                    .checked_div(entry.compressed_size())
                    .unwrap_or(u64::MAX);
                if ratio > self.limits.max_compression_ratio {
                    return Err(ArchiveError::CompressionRatioExceeded {
                        path: name,
                        ratio,
                        limit: self.limits.max_compression_ratio,
                    });
                }
            }
        }

        debug!("archive with {count} entries passed inspection");
        Ok(())
    }
}

/// Validate that an entry name stays inside the extraction root.
///
/// Both separators are checked because zip writers on Windows may emit
/// backslashes.
fn validate_entry_name(name: &str) -> Result<(), ArchiveError> {
    let traversal = || ArchiveError::PathTraversal {
        path: name.to_owned(),
    };

    if name.starts_with('/') || name.starts_with('\\') || name.contains('\0') {
        return Err(traversal());
    }
    if has_drive_prefix(name) {
        return Err(traversal());
    }
    if name.split(['/', '\\']).any(|component| component == "..") {
        return Err(traversal());
    }
    Ok(())
}

fn has_drive_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic()
    )
}
