//! Listing the files a source store offers for collection.

use globset::{Glob, GlobSet, GlobSetBuilder};

use cachet_storage::Storage;

use crate::error::CollectError;

/// Basename globs ignored when no other list is configured: version-control
/// directories, dotfiles and editor backups.
pub const DEFAULT_IGNORE: [&str; 3] = ["CVS", ".*", "*~"];

/// Globs matched against every path component of a name.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    set: GlobSet,
}

impl IgnoreSet {
    /// Compiles the given patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, CollectError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| CollectError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| CollectError::InvalidPattern {
            pattern: String::new(),
            reason: e.to_string(),
        })?;
        Ok(Self { set })
    }

    /// Returns `true` if any component of `name` matches a pattern, so an
    /// ignored directory hides everything below it.
    pub fn is_ignored(&self, name: &str) -> bool {
        name.split('/').any(|component| self.set.is_match(component))
    }
}

/// Lists every name in `store` that is not ignored, in sorted order.
pub fn discover(store: &dyn Storage, ignore: &IgnoreSet) -> Result<Vec<String>, CollectError> {
    let mut names = store.list()?;
    names.retain(|name| {
        let ignored = ignore.is_ignored(name);
        if ignored {
            tracing::debug!(name = %name, "ignored");
        }
        !ignored
    });
    Ok(names)
}
