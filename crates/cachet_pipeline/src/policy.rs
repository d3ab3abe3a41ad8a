//! Strict and lax failure handling.

use crate::error::PipelineError;
use crate::rewrite::Resolve;

/// How the pipeline reacts to unreadable content and broken references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole run on the first failure.
    #[default]
    Strict,
    /// Keep the original name or reference, log a warning, count the
    /// failure and carry on.
    Lax,
}

impl ErrorPolicy {
    /// Maps a `strict = true|false` configuration flag to a policy.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lax
        }
    }

    /// Returns `true` for [`ErrorPolicy::Lax`].
    pub fn is_lax(self) -> bool {
        self == Self::Lax
    }
}

/// A [`Resolve`] decorator that recovers from broken references.
///
/// Resolution is delegated to the wrapped resolver untouched. When the
/// rewriter reports a broken reference, the wrapper logs it, counts it, and
/// lets the rewriter keep the reference as written.
pub struct Lenient<R> {
    inner: R,
    recovered: usize,
}

impl<R: Resolve> Lenient<R> {
    /// Wraps `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            recovered: 0,
        }
    }

    /// Number of failures recovered so far.
    pub fn recovered(&self) -> usize {
        self.recovered
    }
}

impl<R: Resolve> Resolve for Lenient<R> {
    fn resolve(&mut self, name: &str) -> Result<String, PipelineError> {
        self.inner.resolve(name)
    }

    fn recover(&mut self, error: PipelineError) -> Result<(), PipelineError> {
        tracing::warn!(error = %error, "keeping unresolved reference");
        self.recovered += 1;
        Ok(())
    }
}
