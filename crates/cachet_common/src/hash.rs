//! Content hashing for asset fingerprints and change detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex characters of a [`ContentHash`] embedded in a fingerprinted filename.
pub const FINGERPRINT_LEN: usize = 12;

/// A 128-bit content hash computed using XXH3.
///
/// Two assets with the same `ContentHash` are assumed to have identical bytes.
/// The full hash drives change detection between stores; its first
/// [`FINGERPRINT_LEN`] hex characters become the fingerprint segment of a
/// cache-busted filename.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_be_bytes())
    }

    /// Returns the short lowercase-hex fingerprint used in filenames.
    pub fn fingerprint(&self) -> String {
        let mut hex = self.to_string();
        hex.truncate(FINGERPRINT_LEN);
        hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.fingerprint())
    }
}
