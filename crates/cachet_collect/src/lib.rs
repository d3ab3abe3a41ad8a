//! Moving assets between stores.
//!
//! [`Collector`] copies only the files that changed since the last run,
//! deciding per file with a [`Comparison`]. [`discover`] lists the files a
//! source store offers, minus ignored ones. [`rename_to_hashed`] renames
//! already-stored files in place so their names carry a fingerprint.

#![warn(missing_docs)]

pub mod collect;
pub mod comparator;
pub mod discover;
pub mod error;
pub mod rename;

pub use collect::{CollectReport, Collector};
pub use comparator::{CompareFn, Comparison};
pub use discover::{discover, IgnoreSet, DEFAULT_IGNORE};
pub use error::CollectError;
pub use rename::rename_to_hashed;
