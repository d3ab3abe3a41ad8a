//! Choosing how public asset URLs are produced.

use crate::error::ManifestError;
use crate::store::Manifest;

/// Where public URLs come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlMode {
    /// Compute the fingerprinted name on the spot and prefix the base URL.
    #[default]
    Direct,
    /// Look the name up in the manifest written at deploy time.
    Manifest,
}

impl UrlMode {
    /// Maps the `use_manifest` configuration flag to a mode.
    pub fn from_use_manifest(use_manifest: bool) -> Self {
        if use_manifest {
            Self::Manifest
        } else {
            Self::Direct
        }
    }

    /// Returns the public URL for `name`.
    ///
    /// In [`UrlMode::Manifest`] a name missing from the manifest is an
    /// error; there is no fallback to `direct`.
    pub fn url<M, F, E>(self, name: &str, manifest: &M, direct: F) -> Result<String, E>
    where
        M: Manifest + ?Sized,
        F: FnOnce(&str) -> Result<String, E>,
        E: From<ManifestError>,
    {
        match self {
            Self::Direct => direct(name),
            Self::Manifest => Ok(manifest.get(name)?),
        }
    }
}
