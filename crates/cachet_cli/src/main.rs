//! Cachet CLI — fingerprinted static asset builds from the command line.
//!
//! Provides `cachet build` to fingerprint and rewrite assets into the
//! destination directory, `cachet manifest` to write the name → URL
//! manifest, `cachet collect` to copy only changed files, `cachet rename`
//! to add fingerprints to already-stored files, and `cachet url` to resolve
//! a single asset's public URL.

#![warn(missing_docs)]

mod build;
mod collect;
mod manifest;
mod pipeline;
mod rename;
mod url;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Cachet — content-fingerprinted static assets.
#[derive(Parser, Debug)]
#[command(name = "cachet", version, about = "Cachet static asset fingerprinting")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a `cachet.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fingerprint source assets into the destination directory.
    Build(BuildArgs),
    /// Write the manifest of public asset URLs.
    Manifest,
    /// Copy new and changed source files to the destination directory.
    Collect(CollectArgs),
    /// Rename the files in a directory to fingerprinted names.
    Rename(RenameArgs),
    /// Print the public URL of an asset.
    Url(UrlArgs),
}

/// Arguments for the `cachet build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Report what would be written without touching the destination.
    #[arg(long)]
    pub dry_run: bool,

    /// Keep original names and references on errors instead of aborting.
    #[arg(long, conflicts_with = "strict")]
    pub lax: bool,

    /// Abort on the first unreadable file or broken reference.
    #[arg(long)]
    pub strict: bool,

    /// Also write the manifest after a successful build.
    #[arg(long)]
    pub manifest: bool,
}

/// Arguments for the `cachet collect` subcommand.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Comparison used to detect changed files: modified_time (mtime) or
    /// content_hash (file_hash, md5). Defaults to `collect.comparison`.
    #[arg(long)]
    pub compare: Option<String>,

    /// Report what would be copied without touching the destination.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `cachet rename` subcommand.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Directory whose files are renamed in place.
    pub dir: PathBuf,
}

/// Arguments for the `cachet url` subcommand.
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Logical asset name, e.g. `css/app.css`.
    pub name: String,

    /// Look the name up in the manifest even if `manifest.use_manifest` is off.
    #[arg(long)]
    pub manifest: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a custom config file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Manifest => manifest::run(&global),
        Command::Collect(ref args) => collect::run(args, &global),
        Command::Rename(ref args) => rename::run(args, &global),
        Command::Url(ref args) => url::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_default() {
        let cli = Cli::parse_from(["cachet", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(!args.dry_run);
                assert!(!args.lax);
                assert!(!args.strict);
                assert!(!args.manifest);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_flags() {
        let cli = Cli::parse_from(["cachet", "build", "--dry-run", "--lax", "--manifest"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.dry_run);
                assert!(args.lax);
                assert!(args.manifest);
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn lax_conflicts_with_strict() {
        assert!(Cli::try_parse_from(["cachet", "build", "--lax", "--strict"]).is_err());
    }

    #[test]
    fn parse_collect_compare() {
        let cli = Cli::parse_from(["cachet", "collect", "--compare", "md5", "--dry-run"]);
        match cli.command {
            Command::Collect(ref args) => {
                assert_eq!(args.compare.as_deref(), Some("md5"));
                assert!(args.dry_run);
            }
            _ => panic!("expected Collect command"),
        }
    }

    #[test]
    fn parse_rename_dir() {
        let cli = Cli::parse_from(["cachet", "rename", "media/uploads"]);
        match cli.command {
            Command::Rename(ref args) => assert_eq!(args.dir, PathBuf::from("media/uploads")),
            _ => panic!("expected Rename command"),
        }
    }

    #[test]
    fn parse_url_name() {
        let cli = Cli::parse_from(["cachet", "url", "css/app.css", "--manifest"]);
        match cli.command {
            Command::Url(ref args) => {
                assert_eq!(args.name, "css/app.css");
                assert!(args.manifest);
            }
            _ => panic!("expected Url command"),
        }
    }

    #[test]
    fn parse_manifest() {
        let cli = Cli::parse_from(["cachet", "manifest"]);
        assert!(matches!(cli.command, Command::Manifest));
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(Cli::parse_from(["cachet", "build"]).verbose, 0);
        assert_eq!(Cli::parse_from(["cachet", "-vv", "build"]).verbose, 2);
        assert_eq!(Cli::parse_from(["cachet", "build", "-v"]).verbose, 1);
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["cachet", "--quiet", "--config", "site/cachet.toml", "manifest"]);
        assert!(cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("site/cachet.toml"));
    }
}
