//! `cachet build` — fingerprint and rewrite assets into the destination.
//!
//! 1. Find the project root and load `cachet.toml`
//! 2. Discover source assets (ignored names dropped)
//! 3. Run the post-process pipeline into the destination directory
//! 4. Report per-file results and, in lax mode, the recovered error count
//! 5. Optionally rewrite the manifest

use cachet_pipeline::{ErrorPolicy, PostProcessReport};

use crate::pipeline::Project;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `cachet build` command.
///
/// Returns exit code 0 on success. Strict-mode failures are returned as
/// errors; lax-mode failures are counted and reported but do not fail the
/// build.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(global)?;
    let source = project.source();
    let mut dest = project.destination();
    let names = project.discover_sources(&source)?;

    let mut post_processor = project.post_processor()?;
    if args.lax {
        post_processor.set_policy(ErrorPolicy::Lax);
    } else if args.strict {
        post_processor.set_policy(ErrorPolicy::Strict);
    }

    if !global.quiet {
        eprintln!(
            "   Post-processing {} files from {}",
            names.len(),
            source.root().display()
        );
    }

    let report = post_processor.post_process(&source, &names, &mut dest, args.dry_run)?;

    if !global.quiet {
        print_report(&report, args.dry_run, post_processor.policy());
    }

    if args.manifest {
        if args.dry_run {
            tracing::info!("dry run, not writing the manifest");
        } else {
            let written = project.write_manifest(&post_processor, &source, &names)?;
            if !global.quiet {
                eprintln!("   Wrote {written} manifest entries");
            }
        }
    }

    Ok(0)
}

fn print_report(report: &PostProcessReport, dry_run: bool, policy: ErrorPolicy) {
    let verb = if dry_run { "Pretending to post-process" } else { "Post-processed" };
    for result in report.results.iter().filter(|r| r.processed) {
        println!("{verb} '{}' as '{}'", result.original, result.hashed);
    }

    let processed = report.processed_count();
    let unmodified = report.results.len() - processed;
    eprintln!(
        "   {processed} files post-processed, {unmodified} unmodified, {} excluded",
        report.excluded.len()
    );
    if policy.is_lax() {
        let plural = if report.error_count == 1 { "" } else { "s" };
        eprintln!("   {} post-processing error{plural}", report.error_count);
    }
}
