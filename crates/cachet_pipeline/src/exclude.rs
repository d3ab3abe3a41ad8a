//! Exclusion of assets from fingerprinting.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::PipelineError;

/// An ordered set of shell globs; a name is excluded if it matches any.
///
/// Globs follow `fnmatch` conventions: `*` and `?` also match `/`, and
/// `[...]` denotes a character class. Excluded names are never
/// fingerprinted: their public name is their logical name.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExclusionSet {
    /// Compiles the given patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| PipelineError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
            kept.push(pattern.to_string());
        }
        let set = builder.build().map_err(|e| PipelineError::InvalidPattern {
            pattern: kept.join(", "),
            reason: e.to_string(),
        })?;
        Ok(Self {
            patterns: kept,
            set,
        })
    }

    /// An exclusion set that excludes nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Returns `true` if `name` matches any exclusion pattern.
    pub fn is_excluded(&self, name: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(name)
    }

    /// Returns the source patterns in configuration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::empty()
    }
}
