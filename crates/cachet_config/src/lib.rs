//! Parsing and validation of `cachet.toml` configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`CachetConfig`] covering the static asset locations, post-processing
//! (exclusions, strictness, rewrite rules), the manifest, and incremental
//! collection.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
