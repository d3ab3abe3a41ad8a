//! Incremental copying from a source store to a destination store.

use cachet_storage::Storage;

use crate::comparator::Comparison;
use crate::error::CollectError;

/// What a collection run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    /// Names copied (or, in a dry run, that would be copied).
    pub copied: Vec<String>,
    /// Names left alone because the destination copy is current.
    pub skipped: Vec<String>,
}

/// Copies files whose destination copy is missing or out of date.
#[derive(Debug, Default)]
pub struct Collector {
    comparison: Comparison,
}

impl Collector {
    /// Creates a collector using `comparison` to detect changed files.
    pub fn new(comparison: Comparison) -> Self {
        Self { comparison }
    }

    /// Returns the active comparison.
    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    /// Copies `names` from `source` to `dest`.
    ///
    /// A name missing from `dest` is always copied. An existing one is
    /// compared first; if it changed, the stale copy is deleted before the
    /// new one is saved. With `dry_run`, decisions are logged and reported
    /// but `dest` is left untouched.
    pub fn collect(
        &self,
        source: &dyn Storage,
        dest: &mut dyn Storage,
        names: &[String],
        dry_run: bool,
    ) -> Result<CollectReport, CollectError> {
        let mut report = CollectReport::default();

        for name in names {
            if dest.exists(name) {
                if !self.comparison.should_copy(source, &*dest, name)? {
                    tracing::info!("Skipping '{name}' (not modified)");
                    report.skipped.push(name.clone());
                    continue;
                }
                if dry_run {
                    tracing::info!("Pretending to delete '{name}'");
                } else {
                    tracing::info!("Deleting '{name}'");
                    dest.delete(name)?;
                }
            }

            if dry_run {
                tracing::info!("Pretending to copy '{name}'");
            } else {
                let content = source.open(name)?;
                dest.save(name, &content)?;
                tracing::info!("Copying '{name}'");
            }
            report.copied.push(name.clone());
        }

        tracing::info!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            comparison = self.comparison.name(),
            dry_run,
            "collection finished"
        );
        Ok(report)
    }
}
