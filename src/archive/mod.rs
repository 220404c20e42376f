//! Archive handling for uploaded packages.
//!
//! # Sub-modules
//!
//! - [`intake`]: Content-type check and manifest extraction.
//! - [`safety`]: Path traversal and decompression-bomb inspection.

pub mod intake;
pub mod safety;
