//! Configuration types deserialized from `cachet.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `cachet.toml`.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct CachetConfig {
    /// Source and destination locations plus the public URL prefix.
    #[serde(rename = "static", default)]
    pub assets: StaticConfig,
    /// Post-processing settings (exclusions, strictness, rewrite rules).
    #[serde(default)]
    pub postprocess: PostProcessConfig,
    /// Manifest settings.
    #[serde(default)]
    pub manifest: ManifestConfig,
    /// Incremental collection settings.
    #[serde(default)]
    pub collect: CollectConfig,
}

/// Where assets come from, where they go, and how they are addressed publicly.
#[derive(Debug, Deserialize)]
pub struct StaticConfig {
    /// Directory containing the source assets, relative to the project directory.
    #[serde(default = "default_source")]
    pub source: String,
    /// Root of the destination store, relative to the project directory.
    #[serde(default = "default_destination")]
    pub destination: String,
    /// Public URL prefix prepended to stored names. Must end with `/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            base_url: default_base_url(),
        }
    }
}

/// Settings for the fingerprinting post-process pipeline.
#[derive(Debug, Deserialize)]
pub struct PostProcessConfig {
    /// Abort on the first broken reference or unreadable file (`true`), or
    /// keep going and count failures (`false`).
    #[serde(default = "default_true")]
    pub strict: bool,
    /// Shell globs; matching names are never fingerprinted.
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Whether the built-in CSS `url()` / `@import` rules are active.
    #[serde(default = "default_true")]
    pub default_rewrites: bool,
    /// Additional reference rewrite rules, applied after the built-in ones.
    #[serde(default)]
    pub rewrite: Vec<RewriteRuleConfig>,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            strict: true,
            exclusions: Vec::new(),
            default_rewrites: true,
            rewrite: Vec::new(),
        }
    }
}

/// One reference rewrite rule for a family of text assets.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRuleConfig {
    /// Glob selecting the assets this rule applies to (e.g. `*.css`).
    pub glob: String,
    /// Regular expression matching an embedded reference. The reference is
    /// the capture group named `url`, or the first group if none is named.
    pub pattern: String,
    /// Replacement for the whole match; `{url}` is substituted with the
    /// rewritten reference.
    pub template: String,
}

/// Settings for the persisted name → URL manifest.
#[derive(Debug, Deserialize)]
pub struct ManifestConfig {
    /// Manifest implementation. Only `"json"` is available.
    #[serde(default = "default_manifest_kind")]
    pub kind: String,
    /// Manifest file location, relative to the project directory.
    #[serde(default = "default_manifest_path")]
    pub path: String,
    /// Globs of logical names left out of generated manifests.
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Logical names always added to generated manifests.
    #[serde(default)]
    pub extras: Vec<String>,
    /// Serve public URLs through the manifest instead of the local name cache.
    #[serde(default)]
    pub use_manifest: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            kind: default_manifest_kind(),
            path: default_manifest_path(),
            excludes: Vec::new(),
            extras: Vec::new(),
            use_manifest: false,
        }
    }
}

/// Settings for incremental collection into the destination store.
#[derive(Debug, Deserialize)]
pub struct CollectConfig {
    /// Name of the comparison method deciding whether a file changed
    /// (`modified_time`, `mtime`, `file_hash`, `md5`, `content_hash`).
    #[serde(default = "default_comparison")]
    pub comparison: String,
    /// Basename globs skipped during discovery.
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            comparison: default_comparison(),
            ignore: default_ignore(),
        }
    }
}

fn default_source() -> String {
    "static".to_string()
}

fn default_destination() -> String {
    "public".to_string()
}

fn default_base_url() -> String {
    "/static/".to_string()
}

fn default_true() -> bool {
    true
}

fn default_manifest_kind() -> String {
    "json".to_string()
}

fn default_manifest_path() -> String {
    "staticmanifest.json".to_string()
}

fn default_comparison() -> String {
    "modified_time".to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["CVS".to_string(), ".*".to_string(), "*~".to_string()]
}
