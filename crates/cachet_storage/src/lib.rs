//! Content stores that assets are read from and written to.
//!
//! The [`Storage`] trait is the contract the pipeline, manifest builder and
//! collector work against. Two backends are provided: [`FileSystemStorage`]
//! rooted at a local directory, and [`MemoryStorage`] for dry runs and
//! tests. [`HashedNameStorage`] wraps any backend so that saved files are
//! named after their content.

#![warn(missing_docs)]

pub mod error;
pub mod fs;
pub mod hashed;
pub mod memory;
pub mod storage;

pub use error::StorageError;
pub use fs::FileSystemStorage;
pub use hashed::HashedNameStorage;
pub use memory::MemoryStorage;
pub use storage::Storage;
