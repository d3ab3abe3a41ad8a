//! `cachet collect` — copy new and changed source files to the destination.

use cachet_collect::{Collector, Comparison};

use crate::pipeline::Project;
use crate::{CollectArgs, GlobalArgs};

/// Runs the `cachet collect` command.
///
/// The comparison comes from `--compare`, falling back to
/// `collect.comparison` in `cachet.toml`.
pub fn run(args: &CollectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(global)?;
    let method = args
        .compare
        .as_deref()
        .unwrap_or(project.config.collect.comparison.as_str());
    let comparison: Comparison = method.parse()?;

    let source = project.source();
    let mut dest = project.destination();
    let names = project.discover_sources(&source)?;

    let report = Collector::new(comparison).collect(&source, &mut dest, &names, args.dry_run)?;

    if !global.quiet {
        let verb = if args.dry_run { "would be copied" } else { "copied" };
        eprintln!(
            "   {} files {verb}, {} unmodified",
            report.copied.len(),
            report.skipped.len()
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(dir: &std::path::Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            config: Some(dir.to_string_lossy().into_owned()),
        }
    }

    #[test]
    fn collects_then_skips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cachet.toml"), "[collect]\ncomparison = \"md5\"\n").unwrap();
        std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
        std::fs::write(dir.path().join("static/js/app.js"), "1").unwrap();
        std::fs::write(dir.path().join("static/js/app.js~"), "backup").unwrap();

        let args = CollectArgs {
            compare: None,
            dry_run: false,
        };
        assert_eq!(run(&args, &global(dir.path())).unwrap(), 0);
        assert!(dir.path().join("public/js/app.js").is_file());
        assert!(!dir.path().join("public/js/app.js~").exists());

        assert_eq!(run(&args, &global(dir.path())).unwrap(), 0);
    }

    #[test]
    fn unknown_comparison_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cachet.toml"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        let args = CollectArgs {
            compare: Some("sha1".to_string()),
            dry_run: false,
        };
        let err = run(&args, &global(dir.path())).unwrap_err();
        assert!(err.to_string().contains("sha1"));
    }
}
