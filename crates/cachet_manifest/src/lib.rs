//! Persisted mapping from logical asset names to public URLs.
//!
//! A manifest is written once per deployment (`clear`, `add` for every
//! asset, `flush`) and read many times by whatever renders pages (`get`).
//! Reads go through a [`ManifestLookup`] cache that is invalidated whenever
//! the manifest file's modification time changes.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod lookup;
pub mod store;
pub mod url;

pub use builder::build_manifest;
pub use error::ManifestError;
pub use lookup::ManifestLookup;
pub use store::{open_manifest, JsonManifest, Manifest, JSON_KIND};
pub use url::UrlMode;
