//! Rewriting asset references embedded in text assets.
//!
//! A [`Rewriter`] holds families of [`RewriteRule`]s, each family selected
//! by a glob on the asset name. Every rule is a regular expression whose
//! `url` group (or first group) captures a reference; the whole match is
//! replaced by the rule's template with `{url}` substituted.
//!
//! References are resolved relative to the directory of the asset that
//! contains them and handed to a [`Resolve`] implementation, which returns
//! the fingerprinted name. The rewritten reference keeps the directory part
//! as written and swaps in the fingerprinted file name:
//!
//! ```text
//! css/app.css:  url("../img/logo.png?v=2")
//!            -> url("../img/logo.0123456789ab.png?v=2")
//! ```

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::error::PipelineError;

/// Placeholder substituted with the rewritten reference in a rule template.
const URL_PLACEHOLDER: &str = "{url}";

/// Prefixes of references that never point into the asset namespace.
const EXTERNAL_PREFIXES: [&str; 5] = ["http:", "https:", "//", "#", "data:"];

/// Built-in rules for stylesheets: `url(...)` and `@import "..."`.
const CSS_RULES: [(&str, &str); 2] = [
    (
        r#"url\(\s*['"]?\s*(?P<url>.*?)\s*['"]?\s*\)"#,
        r#"url("{url}")"#,
    ),
    (
        r#"@import\s*["']\s*(?P<url>.*?)["']"#,
        r#"@import url("{url}")"#,
    ),
];

/// Maps a logical asset name to its fingerprinted name.
///
/// The pipeline implements this by fingerprinting (and saving) the target
/// on demand; tests can use a plain map.
pub trait Resolve {
    /// Returns the fingerprinted name for `name`. Returning `name` itself
    /// leaves references to it untouched.
    fn resolve(&mut self, name: &str) -> Result<String, PipelineError>;

    /// Decides what happens to a broken reference. Returning `Ok(())`
    /// keeps the reference as written and continues with the rest of the
    /// asset; the default propagates the error.
    fn recover(&mut self, error: PipelineError) -> Result<(), PipelineError> {
        Err(error)
    }
}

impl<R: Resolve + ?Sized> Resolve for &mut R {
    fn resolve(&mut self, name: &str) -> Result<String, PipelineError> {
        (**self).resolve(name)
    }

    fn recover(&mut self, error: PipelineError) -> Result<(), PipelineError> {
        (**self).recover(error)
    }
}

/// One regular expression and the template its matches are replaced with.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    regex: Regex,
    template: String,
}

impl RewriteRule {
    /// Compiles a rule. The pattern must contain a capture group.
    pub fn new(pattern: &str, template: &str) -> Result<Self, PipelineError> {
        let invalid = |reason: String| PipelineError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };
        let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(invalid("pattern has no capture group for the reference".to_string()));
        }
        if !template.contains(URL_PLACEHOLDER) {
            return Err(invalid(format!("template '{template}' has no {URL_PLACEHOLDER}")));
        }
        Ok(Self {
            regex,
            template: template.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
struct RuleFamily {
    glob: String,
    matcher: GlobMatcher,
    rules: Vec<RewriteRule>,
}

/// Rewrites references inside text assets to fingerprinted names.
#[derive(Debug, Clone)]
pub struct Rewriter {
    base_url: String,
    families: Vec<RuleFamily>,
}

impl Rewriter {
    /// Creates a rewriter without any rules.
    ///
    /// `base_url` is the public prefix of the asset namespace; root-relative
    /// references starting with it are resolved against the namespace root.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            families: Vec::new(),
        }
    }

    /// Creates a rewriter with the built-in `*.css` rules.
    pub fn with_default_rules(base_url: &str) -> Result<Self, PipelineError> {
        let mut rewriter = Self::new(base_url);
        for (pattern, template) in CSS_RULES {
            rewriter.add_rule("*.css", RewriteRule::new(pattern, template)?)?;
        }
        Ok(rewriter)
    }

    /// Appends a rule to the family for `glob`, creating the family if needed.
    pub fn add_rule(&mut self, glob: &str, rule: RewriteRule) -> Result<(), PipelineError> {
        if let Some(family) = self.families.iter_mut().find(|f| f.glob == glob) {
            family.rules.push(rule);
            return Ok(());
        }
        let matcher = Glob::new(glob)
            .map_err(|e| PipelineError::InvalidPattern {
                pattern: glob.to_string(),
                reason: e.to_string(),
            })?
            .compile_matcher();
        self.families.push(RuleFamily {
            glob: glob.to_string(),
            matcher,
            rules: vec![rule],
        });
        Ok(())
    }

    /// Returns the public URL prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` if any rule family applies to `name`.
    pub fn is_rewritable(&self, name: &str) -> bool {
        self.families.iter().any(|f| f.matcher.is_match(name))
    }

    /// Rewrites every reference in `content`, an asset stored as `name`.
    ///
    /// Rules are applied family by family, rule by rule, each over the
    /// output of the previous one. A reference is left exactly as written
    /// when it is external, when it resolves to itself, or when the
    /// resolver recovers from its failure.
    pub fn rewrite<R: Resolve + ?Sized>(
        &self,
        name: &str,
        content: &str,
        resolver: &mut R,
    ) -> Result<String, PipelineError> {
        let mut current = content.to_string();
        for family in self.families.iter().filter(|f| f.matcher.is_match(name)) {
            for rule in &family.rules {
                current = self.apply_rule(rule, name, &current, resolver)?;
            }
        }
        Ok(current)
    }

    fn apply_rule<R: Resolve + ?Sized>(
        &self,
        rule: &RewriteRule,
        name: &str,
        content: &str,
        resolver: &mut R,
    ) -> Result<String, PipelineError> {
        let mut out = String::with_capacity(content.len());
        let mut last = 0;
        for caps in rule.regex.captures_iter(content) {
            let (Some(whole), Some(reference)) =
                (caps.get(0), caps.name("url").or_else(|| caps.get(1)))
            else {
                continue;
            };
            out.push_str(&content[last..whole.start()]);
            let rewritten = match self.rewrite_reference(name, reference.as_str(), resolver) {
                Ok(rewritten) => rewritten,
                Err(error) => {
                    resolver.recover(error)?;
                    None
                }
            };
            match rewritten {
                Some(url) => out.push_str(&rule.template.replace(URL_PLACEHOLDER, &url)),
                None => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        out.push_str(&content[last..]);
        Ok(out)
    }

    /// Returns the rewritten reference, or `None` to keep it as written.
    fn rewrite_reference<R: Resolve + ?Sized>(
        &self,
        name: &str,
        reference: &str,
        resolver: &mut R,
    ) -> Result<Option<String>, PipelineError> {
        let reference = reference.trim();
        if reference.is_empty() || EXTERNAL_PREFIXES.iter().any(|p| reference.starts_with(p)) {
            return Ok(None);
        }

        let (path, suffix) = match reference.find(['?', '#']) {
            Some(i) => reference.split_at(i),
            None => (reference, ""),
        };
        if path.is_empty() || path.ends_with('/') {
            return Ok(None);
        }

        let broken = |reason: String| PipelineError::BrokenReference {
            name: name.to_string(),
            reference: reference.to_string(),
            reason,
        };

        let rooted = path.starts_with('/');
        let normalized = if rooted {
            let relative = path
                .strip_prefix(self.base_url.as_str())
                .unwrap_or_else(|| path.trim_start_matches('/'));
            normalize(relative)
        } else {
            match name.rfind('/') {
                Some(i) => normalize(&format!("{}/{}", &name[..i], path)),
                None => normalize(path),
            }
        };
        let target = normalized
            .ok_or_else(|| broken("reference points outside the asset root".to_string()))?;

        let hashed = resolver
            .resolve(&target)
            .map_err(|e| broken(e.to_string()))?;
        if hashed == target {
            return Ok(None);
        }

        let url = if rooted {
            format!("{}{hashed}{suffix}", self.base_url)
        } else {
            let dir = path.rfind('/').map(|i| &path[..=i]).unwrap_or("");
            let file_name = hashed.rsplit('/').next().unwrap_or(hashed.as_str());
            format!("{dir}{file_name}{suffix}")
        };
        Ok(Some(url))
    }
}

/// Collapses `.` and `..` segments. Returns `None` if the path climbs
/// above the root or names nothing.
fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            part => parts.push(part),
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
