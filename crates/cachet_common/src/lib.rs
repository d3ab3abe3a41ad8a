//! Shared foundational types for the Cachet asset pipeline.
//!
//! This crate is free of I/O: it provides the content hash used for
//! fingerprints and change detection, the `name.hash.ext` filename codec,
//! and the pure fingerprinting function built from both.

#![warn(missing_docs)]

pub mod filename;
pub mod fingerprint;
pub mod hash;

pub use filename::{compose, decompose, FileNameParts, HASH_SEGMENT_LEN};
pub use fingerprint::{fingerprinted_name, fingerprinted_name_with_suffix};
pub use hash::ContentHash;
