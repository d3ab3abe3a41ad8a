//! Deciding whether a source file should replace its destination copy.

use std::fmt;
use std::str::FromStr;

use cachet_storage::{Storage, StorageError};

use crate::error::CollectError;

/// A caller-supplied comparison: `(source, dest, name)` to "copy it?".
pub type CompareFn = Box<dyn Fn(&dyn Storage, &dyn Storage, &str) -> Result<bool, StorageError>>;

/// How [`Collector`](crate::Collector) decides that a file changed.
#[derive(Default)]
pub enum Comparison {
    /// Copy unless the source file is older than the destination file.
    #[default]
    ModifiedTime,
    /// Copy if the content hashes differ.
    ContentHash,
    /// Copy if the function says so.
    Custom(CompareFn),
}

impl Comparison {
    /// Returns `true` if `name` should be copied from `source` over the
    /// copy already in `dest`.
    pub fn should_copy(
        &self,
        source: &dyn Storage,
        dest: &dyn Storage,
        name: &str,
    ) -> Result<bool, CollectError> {
        match self {
            Self::ModifiedTime => {
                let new = source.modified_time(name)?;
                let old = dest.modified_time(name)?;
                Ok(new >= old)
            }
            Self::ContentHash => {
                let new = source.content_hash(name)?;
                let old = dest.content_hash(name)?;
                Ok(new != old)
            }
            Self::Custom(compare) => Ok(compare(source, dest, name)?),
        }
    }

    /// Canonical method name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModifiedTime => "modified_time",
            Self::ContentHash => "content_hash",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Comparison {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modified_time" | "mtime" => Ok(Self::ModifiedTime),
            "content_hash" | "file_hash" | "md5" | "hash" => Ok(Self::ContentHash),
            other => Err(CollectError::UnsupportedComparisonMethod {
                method: other.to_string(),
            }),
        }
    }
}
