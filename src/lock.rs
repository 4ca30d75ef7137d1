//! Advisory lock serialising invocations that share a trash root.
//!
//! The lock is an exclusive `flock` on the trash root directory itself, so no
//! extra file appears among the deletion groups. The kernel drops it when the
//! process exits, even after a crash.

use crate::errors::CoreError;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Held for the duration of one operation; released on drop.
#[derive(Debug)]
pub struct TrashLock {
    path: PathBuf,
    _handle: File,
}

impl TrashLock {
    /// Takes the lock without waiting; a held lock fails with `Locked`.
    pub fn acquire(root: &Path) -> crate::Result<Self> {
        let handle = File::open(root).map_err(|err| CoreError::io(root, err))?;
        lock_exclusive(&handle, root)?;
        log::trace!("locked {}", root.display());
        Ok(Self {
            path: root.to_path_buf(),
            _handle: handle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TrashLock {
    fn drop(&mut self) {
        log::trace!("unlocked {}", self.path.display());
    }
}

#[cfg(unix)]
fn lock_exclusive(handle: &File, root: &Path) -> crate::Result<()> {
    use std::io;
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(handle.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(());
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::WouldBlock {
        Err(CoreError::Locked(root.to_path_buf()))
    } else {
        Err(CoreError::io(root, err))
    }
}

#[cfg(not(unix))]
fn lock_exclusive(_handle: &File, _root: &Path) -> crate::Result<()> {
    Ok(())
}
