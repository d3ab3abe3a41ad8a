//! Post-processing real directories and writing the resulting manifest.

use std::path::Path;

use cachet_common::fingerprinted_name;
use cachet_manifest::{build_manifest, JsonManifest, Manifest, ManifestError};
use cachet_pipeline::{ErrorPolicy, ExclusionSet, PipelineError, PostProcessor, Rewriter};
use cachet_storage::{FileSystemStorage, Storage};

fn write(root: &Path, name: &str, content: &[u8]) {
    let path = root.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn processor(policy: ErrorPolicy) -> PostProcessor {
    PostProcessor::new(
        ExclusionSet::new(["*.txt"]).unwrap(),
        Rewriter::with_default_rules("/static/").unwrap(),
        policy,
    )
}

#[test]
fn build_then_manifest() {
    let src_dir = tempfile::tempdir().unwrap();
    let dest_dir = tempfile::tempdir().unwrap();
    write(src_dir.path(), "a/css/b.css", b"body{background:url(../img/x.png)}");
    write(src_dir.path(), "a/img/x.png", b"PNGDATA");
    write(src_dir.path(), "robots.txt", b"User-agent: *");

    let source = FileSystemStorage::new(src_dir.path());
    let mut dest = FileSystemStorage::new(dest_dir.path());
    let names = source.list().unwrap();
    assert_eq!(names, vec!["a/css/b.css", "a/img/x.png", "robots.txt"]);

    let mut pp = processor(ErrorPolicy::Strict);
    let report = pp.post_process(&source, &names, &mut dest, false).unwrap();
    assert_eq!(report.excluded, vec!["robots.txt"]);
    assert_eq!(report.processed_count(), 2);

    let image = fingerprinted_name("a/img/x.png", b"PNGDATA");
    let css = fingerprinted_name("a/css/b.css", b"body{background:url(../img/x.png)}");
    assert!(dest_dir.path().join(&image).is_file());
    assert_eq!(
        std::fs::read(dest_dir.path().join("robots.txt")).unwrap(),
        b"User-agent: *"
    );
    let rewritten = std::fs::read_to_string(dest_dir.path().join(&css)).unwrap();
    let image_file = image.rsplit('/').next().unwrap();
    assert_eq!(
        rewritten,
        format!("body{{background:url(\"../img/{image_file}\")}}")
    );

    let manifest_path = dest_dir.path().join("staticmanifest.json");
    let mut manifest = JsonManifest::new(&manifest_path);
    let written = build_manifest::<_, _, Box<dyn std::error::Error>>(
        &mut manifest,
        &names,
        &[],
        &[],
        |name| Ok(pp.url(name, &source)?),
    )
    .unwrap();
    assert_eq!(written, 3);
    assert_eq!(manifest.get("a/img/x.png").unwrap(), format!("/static/{image}"));
    assert_eq!(manifest.get("robots.txt").unwrap(), "/static/robots.txt");
    assert!(matches!(
        manifest.get("missing.js"),
        Err(ManifestError::NotInManifest { .. })
    ));
}

#[test]
fn second_run_is_idempotent() {
    let src_dir = tempfile::tempdir().unwrap();
    let dest_dir = tempfile::tempdir().unwrap();
    write(src_dir.path(), "css/app.css", b"@import 'reset.css'; a{b:url(/static/img/i.png)}");
    write(src_dir.path(), "css/reset.css", b"*{margin:0}");
    write(src_dir.path(), "img/i.png", b"I");

    let source = FileSystemStorage::new(src_dir.path());
    let mut dest = FileSystemStorage::new(dest_dir.path());
    let names = source.list().unwrap();

    let mut pp = processor(ErrorPolicy::Strict);
    let first = pp.post_process(&source, &names, &mut dest, false).unwrap();
    assert!(first.results.iter().all(|r| r.processed));

    let second = pp.post_process(&source, &names, &mut dest, false).unwrap();
    assert!(second.results.iter().all(|r| !r.processed));
    let hashed = |report: &cachet_pipeline::PostProcessReport| {
        let mut names: Vec<String> = report.results.iter().map(|r| r.hashed.clone()).collect();
        names.sort();
        names
    };
    assert_eq!(hashed(&first), hashed(&second));
}

#[test]
fn lax_run_reports_broken_references() {
    let src_dir = tempfile::tempdir().unwrap();
    let dest_dir = tempfile::tempdir().unwrap();
    let css = b"a{b:url(gone.png)} c{d:url(here.png)}";
    write(src_dir.path(), "app.css", css);
    write(src_dir.path(), "here.png", b"H");

    let source = FileSystemStorage::new(src_dir.path());
    let names = source.list().unwrap();

    let mut strict_dest = FileSystemStorage::new(dest_dir.path().join("strict"));
    let err = processor(ErrorPolicy::Strict)
        .post_process(&source, &names, &mut strict_dest, false)
        .unwrap_err();
    assert!(matches!(err, PipelineError::BrokenReference { .. }));

    let mut lax_dest = FileSystemStorage::new(dest_dir.path().join("lax"));
    let report = processor(ErrorPolicy::Lax)
        .post_process(&source, &names, &mut lax_dest, false)
        .unwrap();
    assert_eq!(report.error_count, 1);

    let saved = lax_dest.open(&fingerprinted_name("app.css", css)).unwrap();
    let saved = String::from_utf8(saved).unwrap();
    let here = fingerprinted_name("here.png", b"H");
    assert_eq!(saved, format!("a{{b:url(gone.png)}} c{{d:url(\"{here}\")}}"));
}
