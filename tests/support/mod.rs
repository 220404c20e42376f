//! Shared test support for building extension packages in memory.
//!
//! [`PackageBuilder`] writes zip archives with `zip::ZipWriter`, so suites can
//! describe a package entry by entry and hand it to the validator as an
//! [`UploadedPackage`].

use extension_validator::archive::intake::{
    EXPECTED_CONTENT_TYPE, MANIFEST_FILENAME, UploadedPackage,
};
use serde_json::{Value, json};
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// In-memory upload handed to the validator.
pub type MemoryUpload = UploadedPackage<Cursor<Vec<u8>>>;

/// Incrementally builds a zip archive.
pub struct PackageBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageBuilder {
    /// Start an empty archive.
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add `manifest.json` serialised from `manifest`.
    pub fn manifest(self, manifest: &Value) -> Self {
        self.file(MANIFEST_FILENAME, manifest.to_string().as_bytes())
    }

    /// Add `manifest.json` holding exactly `bytes`.
    pub fn raw_manifest(self, bytes: &[u8]) -> Self {
        self.file(MANIFEST_FILENAME, bytes)
    }

    /// Add a deflated entry.
    pub fn file(mut self, name: &str, contents: &[u8]) -> Self {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(name, options).expect("start entry");
        self.writer.write_all(contents).expect("write entry");
        self
    }

    /// Add a symbolic link entry.
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.writer
            .add_symlink(name, target, SimpleFileOptions::default())
            .expect("add symlink");
        self
    }

    /// Finish the archive and return its bytes.
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().expect("finish archive").into_inner()
    }

    /// Finish the archive and wrap it as a correctly typed upload.
    pub fn upload(self) -> MemoryUpload {
        UploadedPackage::from_bytes(self.build(), EXPECTED_CONTENT_TYPE, "extension.zip")
    }
}

/// A manifest that passes every field validator.
pub fn valid_manifest() -> Value {
    json!({
        "author": "Me, Mŷself and I",
        "name": "My Extënsion",
        "description": "This is a valid descriptiôn",
        "version": "0.1.2.3",
        "icons": {"128": "icons/128.png"},
    })
}

/// Return `valid_manifest` with `field` replaced by `value`.
pub fn manifest_with(field: &str, value: Value) -> Value {
    let mut manifest = valid_manifest();
    if let Value::Object(fields) = &mut manifest {
        fields.insert(field.to_owned(), value);
    }
    manifest
}

/// Return `valid_manifest` with `field` removed.
pub fn manifest_without(field: &str) -> Value {
    let mut manifest = valid_manifest();
    if let Value::Object(fields) = &mut manifest {
        fields.remove(field);
    }
    manifest
}
