//! Moves delete arguments into a deletion-group container.
//!
//! Each entry lands at `<container>/<absolute path without leading '/'>`, so
//! the container mirrors the original location of everything it holds. Every
//! completed step is journaled; when a later step fails the journal is
//! unwound in reverse order before the error is returned.

use crate::errors::CoreError;
use crate::fs::FileSystem;
use crate::helpers::{absolutize, mirror_path, sanitize_user_path};
use crate::models::RelocatedEntry;
use std::path::{Component, Path, PathBuf};

/// Validates delete arguments and turns them into absolute source paths.
///
/// Fails before anything is touched when an argument is missing or would
/// delete the filesystem root or the trash itself. Duplicates collapse, and
/// arguments nested inside another argument are dropped because they move
/// together with their ancestor.
pub fn prepare_sources(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    trash_root: &Path,
) -> crate::Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(CoreError::invalid_input("no paths given to delete"));
    }

    let cwd = fs.current_dir()?;
    let trash_root = absolutize(trash_root, &cwd);
    let trash_root = fs.canonicalize(&trash_root).unwrap_or(trash_root);
    let mut sources: Vec<PathBuf> = Vec::with_capacity(paths.len());

    for path in paths {
        let absolute = resolve_source(fs, path, &cwd)?;
        if absolute.parent().is_none() {
            return Err(CoreError::invalid_input("refusing to delete the filesystem root"));
        }
        if absolute.starts_with(&trash_root) || trash_root.starts_with(&absolute) {
            return Err(CoreError::invalid_input(format!(
                "{} overlaps the trash directory {}",
                sanitize_user_path(path),
                sanitize_user_path(&trash_root)
            )));
        }
        sources.push(absolute);
    }

    sources.sort();
    sources.dedup();
    let mut kept: Vec<PathBuf> = Vec::with_capacity(sources.len());
    for source in sources {
        if let Some(ancestor) = kept.iter().find(|k| source.starts_with(k)) {
            log::debug!(
                "{} is inside {}, moving it with its parent",
                source.display(),
                ancestor.display()
            );
            continue;
        }
        kept.push(source);
    }
    Ok(kept)
}

/// Resolves a delete argument to the absolute path of the entry it names.
///
/// The directories leading to the entry are resolved through the filesystem,
/// so `link/../x` means what the kernel means by it. The last component is
/// kept as written: a symlink argument names the link, not its target.
fn resolve_source(fs: &dyn FileSystem, path: &Path, cwd: &Path) -> crate::Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(CoreError::PathNotFound(path.to_path_buf()));
    }
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    let resolved = match (joined.parent(), joined.components().next_back()) {
        (Some(parent), Some(Component::Normal(name))) => {
            fs.canonicalize(parent).map(|dir| dir.join(name))
        }
        _ => fs.canonicalize(&joined),
    };
    match resolved {
        Ok(absolute) if fs.exists(&absolute) => Ok(absolute),
        _ => Err(CoreError::PathNotFound(path.to_path_buf())),
    }
}

#[derive(Debug)]
enum Step {
    CreatedContainer(PathBuf),
    Moved { from: PathBuf, to: PathBuf },
}

/// Compensating-action list for one relocation.
#[derive(Debug, Default)]
struct Journal {
    steps: Vec<Step>,
}

impl Journal {
    fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    fn into_entries(self) -> Vec<RelocatedEntry> {
        self.steps
            .into_iter()
            .filter_map(|step| match step {
                Step::Moved { from, to } => Some(RelocatedEntry {
                    original_path: from,
                    trashed_path: to,
                }),
                Step::CreatedContainer(_) => None,
            })
            .collect()
    }

    /// Undoes recorded steps newest first and classifies the failure.
    fn unwind(self, fs: &dyn FileSystem, cause: CoreError) -> CoreError {
        let mut stranded = Vec::new();
        let mut container = PathBuf::new();

        for step in self.steps.into_iter().rev() {
            match step {
                Step::Moved { from, to } => {
                    if let Err(err) = fs.rename(&to, &from) {
                        log::error!("could not put {} back: {}", from.display(), err);
                        stranded.push(to);
                    } else {
                        log::debug!("put {} back", from.display());
                    }
                }
                Step::CreatedContainer(path) => {
                    if stranded.is_empty() {
                        if let Err(err) = fs.remove_dir_all(&path) {
                            log::warn!("could not remove container {}: {}", path.display(), err);
                        }
                    }
                    container = path;
                }
            }
        }

        if stranded.is_empty() {
            CoreError::RolledBack(Box::new(cause))
        } else {
            CoreError::InconsistentState {
                container,
                stranded,
                cause: Box::new(cause),
            }
        }
    }
}

/// Creates `container` and moves every source into its mirrored location.
///
/// The container must not exist yet; an `AlreadyExists` failure is returned
/// untouched so the caller can pick another name.
pub fn relocate(
    fs: &dyn FileSystem,
    container: &Path,
    sources: &[PathBuf],
) -> crate::Result<Vec<RelocatedEntry>> {
    fs.create_dir(container)?;

    let mut journal = Journal::default();
    journal.record(Step::CreatedContainer(container.to_path_buf()));

    for source in sources {
        let target = mirror_path(container, source);
        let moved = target
            .parent()
            .map_or(Ok(()), |parent| fs.create_dir_all(parent))
            .and_then(|()| fs.rename(source, &target));

        match moved {
            Ok(()) => {
                log::debug!("moved {} to {}", source.display(), target.display());
                journal.record(Step::Moved {
                    from: source.clone(),
                    to: target,
                });
            }
            Err(err) => return Err(journal.unwind(fs, err)),
        }
    }

    Ok(journal.into_entries())
}
