use crate::errors::CoreError;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Filesystem abstraction boundary for the deletion-group engine.
///
/// Every core component receives an implementation of this trait instead of
/// calling `std::fs` directly, so the components stay independent of where
/// the trash lives and what clock is used to name deletion groups.
pub trait FileSystem: Send + Sync {
    /// Returns the current time in wall-clock format.
    fn now(&self) -> SystemTime;

    /// Returns the directory relative paths are resolved against.
    fn current_dir(&self) -> crate::Result<PathBuf>;

    /// Reads file metadata.
    fn metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Reads symlink metadata.
    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Resolves every symlink and `..` in `path` the way the kernel would.
    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf>;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Creates a single directory, failing if it already exists.
    fn create_dir(&self, path: &Path) -> crate::Result<()>;

    /// Renames/moves a path.
    fn rename(&self, from: &Path, to: &Path) -> crate::Result<()>;

    /// Lists directory children as concrete paths.
    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Removes a file or symlink.
    fn remove_file(&self, path: &Path) -> crate::Result<()>;

    /// Removes a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Returns true when path exists (symlink-aware).
    fn exists(&self, path: &Path) -> bool {
        self.symlink_metadata(path).is_ok()
    }

    /// Returns true when path is a real directory (symlinks are not followed).
    fn is_dir(&self, path: &Path) -> bool {
        self.symlink_metadata(path)
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// Removes whatever node lives at `path`.
    fn remove_any(&self, path: &Path) -> crate::Result<()> {
        if self.is_dir(path) {
            self.remove_dir_all(path)
        } else {
            self.remove_file(path)
        }
    }
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn current_dir(&self) -> crate::Result<PathBuf> {
        std::env::current_dir().map_err(|err| CoreError::io(".", err))
    }

    fn metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::metadata(path).map_err(|err| CoreError::io(path, err))
    }

    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::symlink_metadata(path).map_err(|err| CoreError::io(path, err))
    }

    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf> {
        fs::canonicalize(path).map_err(|err| CoreError::io(path, err))
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        private_dir_builder(true)
            .create(path)
            .map_err(|err| CoreError::io(path, err))
    }

    fn create_dir(&self, path: &Path) -> crate::Result<()> {
        private_dir_builder(false)
            .create(path)
            .map_err(|err| CoreError::io(path, err))
    }

    fn rename(&self, from: &Path, to: &Path) -> crate::Result<()> {
        fs::rename(from, to).map_err(|err| CoreError::move_failure(from, to, err))
    }

    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .map_err(|err| CoreError::DirectoryRead(path.to_path_buf(), err))?
            .map(|entry| entry.map(|v| v.path()))
            .collect::<Result<Vec<PathBuf>, io::Error>>()
            .map_err(|err| CoreError::DirectoryRead(path.to_path_buf(), err))
    }

    fn remove_file(&self, path: &Path) -> crate::Result<()> {
        fs::remove_file(path).map_err(|err| CoreError::io(path, err))
    }

    fn remove_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::remove_dir_all(path).map_err(|err| CoreError::io(path, err))
    }
}

/// Directories created for the trash are private to the current user.
fn private_dir_builder(recursive: bool) -> fs::DirBuilder {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
}
