//! Entry point tying the deletion-group components to one trash root.

use crate::errors::CoreError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::helpers::{ensure_dir_exists, tree_size};
use crate::identifier::IdGenerator;
use crate::lock::TrashLock;
use crate::models::{
    CommandKind, DeletionGroup, DeletionReceipt, FlushReport, FlushRequest, GroupSummary,
    RestoreOutcome, TrashConfig,
};
use crate::registry::Registry;
use crate::{purger, relocator, restorer};
use std::path::PathBuf;

/// Attempts at finding an unused container name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Safe-delete engine bound to one configured trash root.
///
/// Every operation validates the trash root, then holds an exclusive lock on
/// it until the operation finishes.
#[derive(Debug)]
pub struct Trash<F: FileSystem = RealFileSystem> {
    config: TrashConfig,
    fs: F,
    ids: IdGenerator,
}

impl Trash<RealFileSystem> {
    pub fn new(config: TrashConfig) -> Self {
        Self::with_fs(config, RealFileSystem)
    }
}

impl<F: FileSystem> Trash<F> {
    pub fn with_fs(config: TrashConfig, fs: F) -> Self {
        Self {
            config,
            fs,
            ids: IdGenerator::new(),
        }
    }

    pub fn config(&self) -> &TrashConfig {
        &self.config
    }

    fn begin(&self, command: CommandKind) -> crate::Result<TrashLock> {
        let root = &self.config.trash_root;
        if ensure_dir_exists(&self.fs, root)? {
            log::info!("directory {} created", root.display());
        }
        log::debug!("{command}: using trash {}", root.display());
        TrashLock::acquire(root)
    }

    fn registry(&self) -> Registry<'_> {
        Registry::new(&self.fs, self.config.trash_root.clone())
    }

    /// Moves `paths` into a new deletion group.
    pub fn delete(&self, paths: &[PathBuf]) -> crate::Result<DeletionReceipt> {
        let sources = relocator::prepare_sources(&self.fs, paths, &self.config.trash_root)?;
        let _lock = self.begin(CommandKind::Delete)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = self.ids.generate(self.fs.now());
            let group = DeletionGroup::new(name, &self.config.trash_root);
            match relocator::relocate(&self.fs, &group.container, &sources) {
                Ok(entries) => {
                    log::info!(
                        "moved {} entries to {}",
                        entries.len(),
                        group.container.display()
                    );
                    return Ok(DeletionReceipt { group, entries });
                }
                Err(err) if err.is_already_exists() => {
                    log::warn!("container {} already exists, retrying", group.container_name());
                }
                Err(err) => return Err(err),
            }
        }
        Err(CoreError::conflict(format!(
            "could not find an unused deletion group name in {}",
            self.config.trash_root.display()
        )))
    }

    /// Lists stored deletion groups, oldest first.
    pub fn list(&self) -> crate::Result<Vec<GroupSummary>> {
        let _lock = self.begin(CommandKind::List)?;
        let groups = self.registry().groups()?;
        Ok(groups
            .into_iter()
            .map(|group| {
                let original_root = restorer::walk_container(&self.fs, &group.container)
                    .map(|walk| walk.restore_root)
                    .map_err(|err| log::warn!("{err}"))
                    .ok();
                let size_bytes = tree_size(&self.fs, &group.container).ok();
                GroupSummary {
                    group,
                    original_root,
                    size_bytes,
                }
            })
            .collect())
    }

    /// Restores the groups named by `short_ids`.
    ///
    /// Every id is resolved before anything moves; a single unknown or
    /// ambiguous id fails the whole call. Afterwards each group is restored
    /// on its own and reported separately.
    pub fn restore(&self, short_ids: &[String]) -> crate::Result<Vec<RestoreOutcome>> {
        if short_ids.is_empty() {
            return Err(CoreError::invalid_input("no deletion group ids given"));
        }
        let _lock = self.begin(CommandKind::Restore)?;
        let resolved = self.registry().resolve(short_ids)?;

        Ok(resolved
            .into_iter()
            .map(|(requested, group)| {
                let result = restorer::restore(&self.fs, &group);
                RestoreOutcome {
                    requested,
                    group,
                    result,
                }
            })
            .collect())
    }

    /// Permanently removes either every group or the groups named by ids.
    pub fn flush(&self, request: FlushRequest) -> crate::Result<FlushReport> {
        let _lock = self.begin(CommandKind::Flush)?;
        match request {
            FlushRequest::All => {
                let removed = purger::purge_all(&self.fs, &self.config.trash_root)?;
                log::info!("flushed {removed} entries from {}", self.config.trash_root.display());
                Ok(FlushReport::All { removed })
            }
            FlushRequest::Selected(short_ids) => {
                if short_ids.is_empty() {
                    return Err(CoreError::invalid_input("no deletion group ids given"));
                }
                let groups = self
                    .registry()
                    .resolve(&short_ids)?
                    .into_iter()
                    .map(|(_, group)| group)
                    .collect();
                Ok(FlushReport::Selected(purger::purge_selected(&self.fs, groups)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::Metadata;
    use std::io;
    use std::path::Path;
    use std::time::SystemTime;

    /// Real filesystem on which every deletion group name is already taken.
    struct CrowdedFs;

    impl FileSystem for CrowdedFs {
        fn now(&self) -> SystemTime {
            RealFileSystem.now()
        }
        fn current_dir(&self) -> crate::Result<PathBuf> {
            RealFileSystem.current_dir()
        }
        fn metadata(&self, path: &Path) -> crate::Result<Metadata> {
            RealFileSystem.metadata(path)
        }
        fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata> {
            RealFileSystem.symlink_metadata(path)
        }
        fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf> {
            RealFileSystem.canonicalize(path)
        }
        fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.create_dir_all(path)
        }
        fn create_dir(&self, path: &Path) -> crate::Result<()> {
            Err(CoreError::io(path, io::Error::from(io::ErrorKind::AlreadyExists)))
        }
        fn rename(&self, from: &Path, to: &Path) -> crate::Result<()> {
            RealFileSystem.rename(from, to)
        }
        fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
            RealFileSystem.list_dir(path)
        }
        fn remove_file(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.remove_file(path)
        }
        fn remove_dir_all(&self, path: &Path) -> crate::Result<()> {
            RealFileSystem.remove_dir_all(path)
        }
    }

    #[test]
    fn exhausted_group_names_are_a_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();
        let trash = Trash::with_fs(TrashConfig::new(tmp.path().join("trash")), CrowdedFs);

        let err = trash.delete(&[file.clone()]).unwrap_err();

        assert!(matches!(err, CoreError::Conflict(_)));
        assert!(file.exists());
    }
}
