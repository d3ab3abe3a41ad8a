//! Renaming stored files so their names carry a content fingerprint.

use cachet_common::fingerprinted_name;
use cachet_storage::{HashedNameStorage, Storage};

use crate::error::CollectError;

/// Renames each of `names` in `store` to its fingerprinted name.
///
/// Files whose name already carries their current fingerprint are left
/// alone; a stale fingerprint is replaced. When the fingerprinted name is
/// taken, a numeric suffix is added. Returns `(old, new)` for every file
/// that was renamed.
pub fn rename_to_hashed<S>(store: &mut S, names: &[String]) -> Result<Vec<(String, String)>, CollectError>
where
    S: Storage + ?Sized,
{
    let mut renamed = Vec::new();
    for name in names {
        let content = store.open(name)?;
        if fingerprinted_name(name, &content) == *name {
            continue;
        }
        let new_name = HashedNameStorage::new(&mut *store).save(name, &content)?;
        store.delete(name)?;
        tracing::info!("Renaming '{name}' to '{new_name}'");
        renamed.push((name.clone(), new_name));
    }
    Ok(renamed)
}
