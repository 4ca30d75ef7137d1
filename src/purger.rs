//! Irreversible removal of deletion groups.

use crate::fs::FileSystem;
use crate::models::{DeletionGroup, PurgeOutcome};
use std::path::Path;

/// Empties the trash root while keeping the root directory itself, so its
/// ownership and permissions survive.
///
/// The root must already be validated; a missing root is a read error.
/// Returns the number of removed entries.
pub fn purge_all(fs: &dyn FileSystem, trash_root: &Path) -> crate::Result<usize> {
    let children = fs.list_dir(trash_root)?;
    for child in &children {
        fs.remove_any(child)?;
        log::debug!("removed {}", child.display());
    }
    Ok(children.len())
}

/// Removes each group's container, carrying on past individual failures.
pub fn purge_selected(fs: &dyn FileSystem, groups: Vec<DeletionGroup>) -> Vec<PurgeOutcome> {
    groups
        .into_iter()
        .map(|group| {
            let result = fs.remove_dir_all(&group.container);
            match &result {
                Ok(()) => log::info!("flushed {}", group.container_name()),
                Err(err) => log::error!("could not flush {}: {}", group.container_name(), err),
            }
            PurgeOutcome { group, result }
        })
        .collect()
}
