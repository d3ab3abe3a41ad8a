//! Shared helpers for CLI commands.
//!
//! Project root resolution, configuration loading, and construction of the
//! stores, post-processor and manifest every command works with.

use std::path::{Path, PathBuf};

use cachet_collect::{discover, IgnoreSet};
use cachet_config::{CachetConfig, CONFIG_FILE};
use cachet_manifest::{build_manifest, open_manifest, Manifest};
use cachet_pipeline::PostProcessor;
use cachet_storage::FileSystemStorage;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `cachet.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `cachet.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// A loaded project: its root directory and configuration.
pub struct Project {
    /// Directory containing `cachet.toml`.
    pub root: PathBuf,
    /// The parsed configuration.
    pub config: CachetConfig,
}

impl Project {
    /// Finds and loads the project selected by the global args.
    pub fn load(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let root = resolve_project_root(global)?;
        let config = cachet_config::load_config(&root)?;
        tracing::debug!(root = %root.display(), "loaded project");
        Ok(Self { root, config })
    }

    /// The store source assets are read from.
    pub fn source(&self) -> FileSystemStorage {
        FileSystemStorage::new(self.root.join(&self.config.assets.source))
    }

    /// The store fingerprinted assets are written to.
    pub fn destination(&self) -> FileSystemStorage {
        FileSystemStorage::new(self.root.join(&self.config.assets.destination))
    }

    /// Lists the source assets, minus ignored names.
    pub fn discover_sources(
        &self,
        source: &FileSystemStorage,
    ) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        if !source.root().is_dir() {
            return Err(format!("source directory {} does not exist", source.root().display()).into());
        }
        let ignore = IgnoreSet::new(&self.config.collect.ignore)?;
        Ok(discover(source, &ignore)?)
    }

    /// Builds the post-processor from the `[postprocess]` section.
    pub fn post_processor(&self) -> Result<PostProcessor, Box<dyn std::error::Error>> {
        Ok(PostProcessor::from_config(
            &self.config.postprocess,
            &self.config.assets.base_url,
        )?)
    }

    /// Opens the manifest configured in the `[manifest]` section.
    pub fn manifest(&self) -> Result<Box<dyn Manifest>, Box<dyn std::error::Error>> {
        let path = self.root.join(&self.config.manifest.path);
        Ok(open_manifest(&self.config.manifest.kind, &path)?)
    }

    /// Rewrites the manifest with the public URL of every name plus the
    /// configured extras. Returns the number of entries written.
    pub fn write_manifest(
        &self,
        post_processor: &PostProcessor,
        source: &FileSystemStorage,
        names: &[String],
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let mut manifest = self.manifest()?;
        build_manifest(
            &mut *manifest,
            names,
            &self.config.manifest.extras,
            &self.config.manifest.excludes,
            |name| -> Result<String, Box<dyn std::error::Error>> {
                Ok(post_processor.url(name, source)?)
            },
        )
    }
}
