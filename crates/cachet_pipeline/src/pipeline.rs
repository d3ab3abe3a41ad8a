//! The post-process pipeline orchestrator.
//!
//! [`PostProcessor`] ties the exclusion set, the reference rewriter and the
//! name cache together. A run walks the batch deepest path first (ties
//! broken lexicographically), so by the time a stylesheet is rewritten the
//! assets it references next to or below it already have their final
//! names. References to batch members that have not been processed yet are
//! processed on demand; reference cycles are safe because an asset is named
//! from its original bytes before its references are rewritten.
//!
//! Every URL a run hands out points at a file it wrote: excluded assets are
//! copied under their logical names, lax fallbacks are stored unmodified
//! under their logical names, and referenced assets outside the batch are
//! stored under their fingerprinted names.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use cachet_common::fingerprinted_name;
use cachet_config::PostProcessConfig;
use cachet_storage::Storage;

use crate::cache::{cache_key, MemoryNameCache, NameCache};
use crate::error::PipelineError;
use crate::exclude::ExclusionSet;
use crate::policy::{ErrorPolicy, Lenient};
use crate::rewrite::{Resolve, RewriteRule, Rewriter};

/// Outcome for one asset of a post-process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessResult {
    /// The logical name of the asset.
    pub original: String,
    /// The fingerprinted name it is stored under. Equal to `original` when
    /// a lax run could not fingerprint it; the unmodified bytes are then
    /// stored under the logical name, if they could be read.
    pub hashed: String,
    /// `true` if content was written (or, in a dry run, would be written).
    /// `false` if identical bytes were already stored under `hashed`.
    pub processed: bool,
}

/// Everything a post-process run produced.
#[derive(Debug, Clone, Default)]
pub struct PostProcessReport {
    /// One entry per non-excluded asset, in processing order.
    pub results: Vec<PostProcessResult>,
    /// Names matched by the exclusion set, in input order. They are copied
    /// to the destination unmodified, under their logical names.
    pub excluded: Vec<String>,
    /// Failures recovered under [`ErrorPolicy::Lax`].
    pub error_count: usize,
}

impl PostProcessReport {
    /// Number of assets whose content was written.
    pub fn processed_count(&self) -> usize {
        self.results.iter().filter(|r| r.processed).count()
    }
}

/// Fingerprints and rewrites batches of assets.
pub struct PostProcessor {
    exclusions: ExclusionSet,
    rewriter: Rewriter,
    policy: ErrorPolicy,
    cache: Box<dyn NameCache>,
}

impl PostProcessor {
    /// Creates a post-processor with an in-process name cache.
    pub fn new(exclusions: ExclusionSet, rewriter: Rewriter, policy: ErrorPolicy) -> Self {
        Self {
            exclusions,
            rewriter,
            policy,
            cache: Box::new(MemoryNameCache::new()),
        }
    }

    /// Builds a post-processor from the `[postprocess]` configuration.
    pub fn from_config(config: &PostProcessConfig, base_url: &str) -> Result<Self, PipelineError> {
        let exclusions = ExclusionSet::new(&config.exclusions)?;
        let mut rewriter = if config.default_rewrites {
            Rewriter::with_default_rules(base_url)?
        } else {
            Rewriter::new(base_url)
        };
        for rule in &config.rewrite {
            rewriter.add_rule(&rule.glob, RewriteRule::new(&rule.pattern, &rule.template)?)?;
        }
        Ok(Self::new(
            exclusions,
            rewriter,
            ErrorPolicy::from_strict(config.strict),
        ))
    }

    /// Replaces the name cache, e.g. with one shared between processes.
    pub fn with_cache(mut self, cache: Box<dyn NameCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Overrides the error policy.
    pub fn set_policy(&mut self, policy: ErrorPolicy) {
        self.policy = policy;
    }

    /// Returns the active error policy.
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Returns the exclusion set.
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Fingerprints `names` from `source` into `dest`.
    ///
    /// Excluded names are copied to `dest` as they are. With `dry_run`,
    /// nothing is written to `dest`; the report says what would have been.
    /// Results are recorded in the name cache either way, lax fallbacks
    /// included, so [`PostProcessor::url`] agrees with what was stored.
    pub fn post_process(
        &mut self,
        source: &dyn Storage,
        names: &[String],
        dest: &mut dyn Storage,
        dry_run: bool,
    ) -> Result<PostProcessReport, PipelineError> {
        let (excluded, mut order): (Vec<String>, Vec<String>) = names
            .iter()
            .cloned()
            .partition(|name| self.exclusions.is_excluded(name));
        order.sort_by(|a, b| {
            (Reverse(path_depth(a)), a.as_str()).cmp(&(Reverse(path_depth(b)), b.as_str()))
        });
        order.dedup();

        let mut run = Run {
            rewriter: &self.rewriter,
            exclusions: &self.exclusions,
            policy: self.policy,
            source,
            dest,
            dry_run,
            pending: order.iter().cloned().collect(),
            in_progress: HashMap::new(),
            done: HashMap::new(),
            outside: HashMap::new(),
            results: Vec::with_capacity(order.len()),
            error_count: 0,
        };
        for name in &order {
            run.process(name)?;
        }
        for name in &excluded {
            run.pass_through(name)?;
        }

        let Run {
            results,
            error_count,
            ..
        } = run;

        self.cache.set_many(
            results
                .iter()
                .map(|r| (cache_key(&r.original), r.hashed.clone()))
                .collect(),
        );

        if self.policy.is_lax() {
            let plural = if error_count == 1 { "" } else { "s" };
            if error_count > 0 {
                tracing::warn!("{error_count} post-processing error{plural}");
            } else {
                tracing::info!("{error_count} post-processing error{plural}");
            }
        }

        Ok(PostProcessReport {
            results,
            excluded,
            error_count,
        })
    }

    /// Returns the fingerprinted name of `name` without storing anything.
    ///
    /// Excluded names map to themselves. Cached names are answered from the
    /// cache; otherwise the name is fingerprinted from `source`.
    pub fn hashed_name(&self, name: &str, source: &dyn Storage) -> Result<String, PipelineError> {
        if self.exclusions.is_excluded(name) {
            return Ok(name.to_string());
        }
        if let Some(hashed) = self.cache.get(&cache_key(name)) {
            return Ok(hashed);
        }
        let content = source.open(name).map_err(|e| unavailable(name, e))?;
        Ok(fingerprinted_name(name, &content))
    }

    /// Returns the public URL of `name`: the base URL followed by its
    /// fingerprinted name.
    pub fn url(&self, name: &str, source: &dyn Storage) -> Result<String, PipelineError> {
        let hashed = self.hashed_name(name, source)?;
        Ok(format!("{}{hashed}", self.rewriter.base_url()))
    }
}

/// Number of `/` separators in a name; deeper paths sort first.
fn path_depth(name: &str) -> usize {
    name.matches('/').count()
}

fn unavailable(name: &str, error: impl std::fmt::Display) -> PipelineError {
    PipelineError::ContentUnavailable {
        name: name.to_string(),
        reason: error.to_string(),
    }
}

/// State of one post-process run.
struct Run<'a> {
    rewriter: &'a Rewriter,
    exclusions: &'a ExclusionSet,
    policy: ErrorPolicy,
    source: &'a dyn Storage,
    dest: &'a mut dyn Storage,
    dry_run: bool,
    /// Batch members not yet started.
    pending: BTreeSet<String>,
    /// Names being rewritten right now, with their fingerprinted names.
    in_progress: HashMap<String, String>,
    /// Finished names.
    done: HashMap<String, String>,
    /// Fingerprints of referenced assets that are not part of the batch.
    outside: HashMap<String, String>,
    results: Vec<PostProcessResult>,
    error_count: usize,
}

impl Run<'_> {
    fn process(&mut self, name: &str) -> Result<String, PipelineError> {
        if let Some(hashed) = self.done.get(name).or_else(|| self.in_progress.get(name)) {
            return Ok(hashed.clone());
        }
        self.pending.remove(name);

        match self.fingerprint_and_store(name) {
            Ok((hashed, processed)) => {
                tracing::debug!(name, hashed = %hashed, processed, "post-processed");
                self.finish(name, &hashed, processed);
                Ok(hashed)
            }
            Err(error) if self.policy.is_lax() => {
                tracing::warn!(name, error = %error, "could not fingerprint, using original name");
                self.error_count += 1;
                let processed = match self.source.open(name) {
                    Ok(content) => self.store(name, &content)?.1,
                    Err(_) => false,
                };
                self.finish(name, name, processed);
                Ok(name.to_string())
            }
            Err(error) => Err(error),
        }
    }

    /// Copies an excluded asset to the destination under its logical name.
    fn pass_through(&mut self, name: &str) -> Result<(), PipelineError> {
        match self.source.open(name) {
            Ok(content) => {
                let (_, copied) = self.store(name, &content)?;
                tracing::debug!(name, copied, "excluded, copied unmodified");
                Ok(())
            }
            Err(e) if self.policy.is_lax() => {
                tracing::warn!(name, error = %e, "could not copy excluded asset");
                self.error_count += 1;
                Ok(())
            }
            Err(e) => Err(unavailable(name, e)),
        }
    }

    fn finish(&mut self, name: &str, hashed: &str, processed: bool) {
        self.done.insert(name.to_string(), hashed.to_string());
        self.results.push(PostProcessResult {
            original: name.to_string(),
            hashed: hashed.to_string(),
            processed,
        });
    }

    fn fingerprint_and_store(&mut self, name: &str) -> Result<(String, bool), PipelineError> {
        let content = self.source.open(name).map_err(|e| unavailable(name, e))?;
        let hashed = fingerprinted_name(name, &content);

        if !self.rewriter.is_rewritable(name) {
            return self.store(&hashed, &content);
        }

        let text = String::from_utf8(content).map_err(|e| unavailable(name, e))?;
        self.in_progress.insert(name.to_string(), hashed.clone());
        let rewritten = self.rewrite(name, &text);
        self.in_progress.remove(name);
        self.store(&hashed, rewritten?.as_bytes())
    }

    fn rewrite(&mut self, name: &str, text: &str) -> Result<String, PipelineError> {
        let rewriter = self.rewriter;
        match self.policy {
            ErrorPolicy::Strict => rewriter.rewrite(name, text, self),
            ErrorPolicy::Lax => {
                let mut lenient = Lenient::new(&mut *self);
                let rewritten = rewriter.rewrite(name, text, &mut lenient);
                let recovered = lenient.recovered();
                self.error_count += recovered;
                rewritten
            }
        }
    }

    /// Writes `content` under `hashed` unless identical bytes are already there.
    fn store(&mut self, hashed: &str, content: &[u8]) -> Result<(String, bool), PipelineError> {
        if self.dest.exists(hashed) {
            if self.dest.open(hashed)? == content {
                return Ok((hashed.to_string(), false));
            }
            if !self.dry_run {
                self.dest.delete(hashed)?;
            }
        }
        if self.dry_run {
            return Ok((hashed.to_string(), true));
        }
        let saved = self.dest.save(hashed, content)?;
        Ok((saved, true))
    }

    /// Fingerprints a referenced asset that is not part of the batch,
    /// looking in the source store first and the destination second, and
    /// stores it under the fingerprinted name. Its own references are not
    /// rewritten.
    fn fingerprint_outside(&mut self, name: &str) -> Result<String, PipelineError> {
        if let Some(hashed) = self.outside.get(name) {
            return Ok(hashed.clone());
        }
        let content = match self.source.open(name) {
            Ok(content) => content,
            Err(_) if self.dest.exists(name) => self.dest.open(name)?,
            Err(e) => return Err(unavailable(name, e)),
        };
        let (hashed, processed) = self.store(&fingerprinted_name(name, &content), &content)?;
        tracing::debug!(name, hashed = %hashed, processed, "stored referenced asset outside the batch");
        self.outside.insert(name.to_string(), hashed.clone());
        Ok(hashed)
    }
}

impl Resolve for Run<'_> {
    fn resolve(&mut self, name: &str) -> Result<String, PipelineError> {
        if self.exclusions.is_excluded(name) {
            return Ok(name.to_string());
        }
        if self.pending.contains(name)
            || self.done.contains_key(name)
            || self.in_progress.contains_key(name)
        {
            return self.process(name);
        }
        self.fingerprint_outside(name)
    }
}
