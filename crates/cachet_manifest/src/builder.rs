//! Regenerating a manifest from a set of asset names.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::ManifestError;
use crate::store::Manifest;

/// Rebuilds `manifest` from scratch.
///
/// Clears the manifest, adds `name → url_for(name)` for every name not
/// matching an `excludes` glob and for every name in `extras` (excluded or
/// not), then flushes. Returns the number of entries written.
pub fn build_manifest<M, F, E>(
    manifest: &mut M,
    names: &[String],
    extras: &[String],
    excludes: &[String],
    mut url_for: F,
) -> Result<usize, E>
where
    M: Manifest + ?Sized,
    F: FnMut(&str) -> Result<String, E>,
    E: From<ManifestError>,
{
    let excluded = compile_excludes(excludes)?;
    manifest.clear();

    let mut keys: Vec<&String> = names
        .iter()
        .filter(|name| {
            let skip = excluded.is_match(name.as_str());
            if skip {
                tracing::debug!(name = %name, "excluded from manifest");
            }
            !skip
        })
        .chain(extras)
        .collect();
    keys.sort();
    keys.dedup();

    for name in &keys {
        let url = url_for(name)?;
        manifest.add(name, &url);
    }

    manifest.flush()?;
    Ok(keys.len())
}

fn compile_excludes(patterns: &[String]) -> Result<GlobSet, ManifestError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ManifestError::Config {
            reason: format!("invalid manifest exclude '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ManifestError::Config {
        reason: e.to_string(),
    })
}
