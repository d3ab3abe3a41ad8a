//! `cachet rename` — add fingerprints to the names of stored files.

use cachet_collect::{discover, rename_to_hashed, IgnoreSet, DEFAULT_IGNORE};
use cachet_storage::FileSystemStorage;

use crate::{GlobalArgs, RenameArgs};

/// Runs the `cachet rename` command.
///
/// Works on any directory; no `cachet.toml` is needed. Dotfiles, `CVS`
/// directories and editor backups are left alone.
pub fn run(args: &RenameArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if !args.dir.is_dir() {
        return Err(format!("{} is not a directory", args.dir.display()).into());
    }
    let mut store = FileSystemStorage::new(&args.dir);
    let names = discover(&store, &IgnoreSet::new(DEFAULT_IGNORE)?)?;
    let renamed = rename_to_hashed(&mut store, &names)?;

    if !global.quiet {
        for (old, new) in &renamed {
            println!("Renamed '{old}' to '{new}'");
        }
        eprintln!("   {} of {} files renamed", renamed.len(), names.len());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_directory_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("uploads")).unwrap();
        std::fs::write(dir.path().join("uploads/cat.jpg"), "meow").unwrap();
        std::fs::write(dir.path().join(".keep"), "").unwrap();

        let args = RenameArgs {
            dir: dir.path().to_path_buf(),
        };
        let global = GlobalArgs {
            quiet: true,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(!dir.path().join("uploads/cat.jpg").exists());
        assert!(dir.path().join(".keep").exists());

        let hashed = cachet_common::fingerprinted_name("uploads/cat.jpg", b"meow");
        assert!(dir.path().join(hashed).is_file());
    }

    #[test]
    fn missing_directory_fails() {
        let args = RenameArgs {
            dir: "/definitely/not/here".into(),
        };
        let global = GlobalArgs {
            quiet: true,
            config: None,
        };
        assert!(run(&args, &global).is_err());
    }
}
