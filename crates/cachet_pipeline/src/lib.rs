//! Fingerprinting post-process pipeline for static assets.
//!
//! Given a batch of asset names in a source store, the pipeline drops
//! excluded names, orders the rest deepest-first, rewrites references
//! embedded in text assets (CSS `url()` and `@import` by default) to point
//! at fingerprinted names, and saves every asset under its fingerprinted
//! name in the destination store.
//!
//! Failures follow an [`ErrorPolicy`]: strict runs abort on the first
//! broken reference or unreadable file, lax runs keep the original name,
//! log a warning and count the failure.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod exclude;
pub mod pipeline;
pub mod policy;
pub mod rewrite;

pub use cache::{cache_key, MemoryNameCache, NameCache};
pub use error::PipelineError;
pub use exclude::ExclusionSet;
pub use pipeline::{PostProcessReport, PostProcessResult, PostProcessor};
pub use policy::{ErrorPolicy, Lenient};
pub use rewrite::{Resolve, RewriteRule, Rewriter};
