//! Moves the contents of a deletion group back to where they came from.
//!
//! The original location is not stored anywhere: it is recovered by walking
//! down the container while each level holds exactly one entry and that
//! entry is a directory. The names collected on the way form the absolute
//! path that the leaf contents are moved back into.

use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::helpers::ensure_dir_exists;
use crate::models::{DeletionGroup, RestoreReport};
use std::path::{Path, PathBuf};

/// Result of walking a container's single-child directory chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerWalk {
    /// Absolute path the leaf contents belong to.
    pub restore_root: PathBuf,
    /// Directory inside the container holding the items to move back.
    pub leaf: PathBuf,
    /// Items found in `leaf`.
    pub items: Vec<PathBuf>,
}

/// Walks `container` down its single-child directory chain.
pub fn walk_container(fs: &dyn FileSystem, container: &Path) -> crate::Result<ContainerWalk> {
    let mut restore_root = PathBuf::from("/");
    let mut current = container.to_path_buf();

    loop {
        let children = fs.list_dir(&current)?;
        let only_dir = match children.as_slice() {
            [only] if fs.is_dir(only) => Some(only.clone()),
            _ => None,
        };
        let Some(only) = only_dir else {
            return Ok(ContainerWalk {
                restore_root,
                leaf: current,
                items: children,
            });
        };
        if let Some(segment) = only.file_name() {
            restore_root.push(segment);
        }
        current = only;
    }
}

/// Restores one deletion group and removes its container.
///
/// Items whose destination already exists are left inside the container,
/// except directories meeting an existing directory, which are merged entry
/// by entry. The container is only removed once nothing is left behind;
/// otherwise `PartialRestore` names what remains.
pub fn restore(fs: &dyn FileSystem, group: &DeletionGroup) -> crate::Result<RestoreReport> {
    let walk = walk_container(fs, &group.container)?;
    if ensure_dir_exists(fs, &walk.restore_root)? {
        log::info!("directory {} created", walk.restore_root.display());
    }

    let mut restored = Vec::new();
    let mut remaining = Vec::new();
    for item in &walk.items {
        move_back(fs, item, &walk.restore_root, &mut restored, &mut remaining)?;
    }

    if !remaining.is_empty() {
        return Err(CoreError::PartialRestore {
            id: group.id().to_string(),
            container: group.container.clone(),
            remaining,
        });
    }

    fs.remove_dir_all(&group.container)?;
    log::info!("restored {} into {}", group.id(), walk.restore_root.display());
    Ok(RestoreReport {
        restore_root: walk.restore_root,
        restored,
    })
}

fn move_back(
    fs: &dyn FileSystem,
    item: &Path,
    destination_dir: &Path,
    restored: &mut Vec<PathBuf>,
    remaining: &mut Vec<PathBuf>,
) -> crate::Result<()> {
    let Some(name) = item.file_name() else {
        return Ok(());
    };
    let destination = destination_dir.join(name);

    if !fs.exists(&destination) {
        return match fs.rename(item, &destination) {
            Ok(()) => {
                log::debug!("moved {} to {}", item.display(), destination.display());
                restored.push(destination);
                Ok(())
            }
            Err(err) => {
                log::error!("{err}");
                remaining.push(item.to_path_buf());
                Ok(())
            }
        };
    }

    if fs.is_dir(item) && fs.is_dir(&destination) {
        for child in fs.list_dir(item)? {
            move_back(fs, &child, &destination, restored, remaining)?;
        }
        return Ok(());
    }

    log::error!(
        "cannot restore {}: {} already exists",
        item.display(),
        destination.display()
    );
    remaining.push(item.to_path_buf());
    Ok(())
}
