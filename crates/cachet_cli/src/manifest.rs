//! `cachet manifest` — write the manifest of public asset URLs.
//!
//! Every discovered source asset (minus `manifest.excludes`, plus
//! `manifest.extras`) is mapped to its public URL. The manifest is cleared
//! first, so entries for assets that no longer exist are dropped.

use crate::pipeline::Project;
use crate::GlobalArgs;

/// Runs the `cachet manifest` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(global)?;
    let source = project.source();
    let names = project.discover_sources(&source)?;
    let post_processor = project.post_processor()?;

    let written = project.write_manifest(&post_processor, &source, &names)?;
    if !global.quiet {
        eprintln!(
            "   Wrote {written} entries to {}",
            project.root.join(&project.config.manifest.path).display()
        );
    }
    Ok(0)
}
