//! Manifest decoding and the in-memory document model.
//!
//! - [`decoder`]: UTF-8 and JSON decoding of raw manifest bytes.
//! - [`value`]: [`ManifestDocument`](value::ManifestDocument) and the
//!   [`ManifestValue`](value::ManifestValue) sum type.

pub mod decoder;
pub mod value;
