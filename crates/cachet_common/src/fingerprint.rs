//! Deriving fingerprinted names from asset content.

use crate::filename::{compose, decompose, is_hash_segment};
use crate::hash::ContentHash;

/// Returns `name` with a fingerprint of `content` embedded before its extension.
///
/// Any fingerprint already present in `name` is replaced, so a name never
/// carries more than one: `app.css` and `app.0123456789ab.css` map to the
/// same result for the same bytes.
pub fn fingerprinted_name(name: &str, content: &[u8]) -> String {
    fingerprinted_name_with_suffix(name, content, None)
}

/// Like [`fingerprinted_name`], but inserts `_<suffix>` between the basename
/// and the fingerprint.
///
/// Used to pick a free destination name when two different sources would
/// otherwise collide.
pub fn fingerprinted_name_with_suffix(name: &str, content: &[u8], suffix: Option<u32>) -> String {
    let parts = decompose(name);
    // `LICENSE.0123456789ab` is a fingerprinted name without an extension.
    let ext = if !parts.is_hashed() && is_hash_segment(parts.ext) {
        ""
    } else {
        parts.ext
    };
    let hash = format!(".{}", ContentHash::from_bytes(content).fingerprint());
    match suffix {
        Some(n) => compose(&format!("{}_{n}", parts.base), &hash, ext),
        None => compose(parts.base, &hash, ext),
    }
}
