//! `cachet url` — print the public URL of one asset.

use cachet_manifest::UrlMode;

use crate::pipeline::Project;
use crate::{GlobalArgs, UrlArgs};

/// Runs the `cachet url` command.
///
/// With `manifest.use_manifest` (or `--manifest`) the URL is read from the
/// manifest and a missing name is an error. Otherwise it is computed from
/// the source file's content.
pub fn run(args: &UrlArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = Project::load(global)?;
    let mode = if args.manifest {
        UrlMode::Manifest
    } else {
        UrlMode::from_use_manifest(project.config.manifest.use_manifest)
    };

    let source = project.source();
    let post_processor = project.post_processor()?;
    let manifest = project.manifest()?;

    let url = mode.url(
        &args.name,
        &*manifest,
        |name| -> Result<String, Box<dyn std::error::Error>> {
            Ok(post_processor.url(name, &source)?)
        },
    )?;
    println!("{url}");
    Ok(0)
}
