//! Advisory lock around the read-next-id-then-append sequence.
//!
//! Two `pclaude` processes capturing at the same moment would otherwise
//! both read the same last line and hand out the same id. The lock lives
//! in a sibling file (`prompts.jsonl.lock`) so the archive itself is only
//! ever opened in append mode for writing.
//!
//! `flock(2)` is called directly through `libc`; the guard owns the
//! `File` and releases the lock in `Drop`, so every exit path unlocks.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use super::ArchiveError;

/// Exclusive advisory lock on the archive. Released on drop.
pub struct ArchiveLock {
    #[cfg_attr(not(unix), allow(dead_code))]
    file: File,
    lock_path: PathBuf,
}

impl std::fmt::Debug for ArchiveLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveLock")
            .field("lock_path", &self.lock_path)
            .finish()
    }
}

impl ArchiveLock {
    /// Returns the path of the lock file.
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

/// Returns the lock file path for an archive.
pub fn lock_path_for(archive_path: &Path) -> PathBuf {
    let mut name = archive_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    archive_path.with_file_name(name)
}

/// Blocks until an exclusive lock on the archive is held.
///
/// The archive's parent directory must already exist.
pub fn acquire(archive_path: &Path) -> Result<ArchiveLock, ArchiveError> {
    let lock_path = lock_path_for(archive_path);

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|source| ArchiveError::LockFailed {
            path: lock_path.clone(),
            source,
        })?;

    lock_exclusive(&file).map_err(|source| ArchiveError::LockFailed {
        path: lock_path.clone(),
        source,
    })?;

    tracing::debug!("Acquired archive lock {}", lock_path.display());
    Ok(ArchiveLock { file, lock_path })
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    loop {
        // SAFETY: `fd` is a valid descriptor owned by `file` for the
        // duration of this call.
        let ret = unsafe { libc::flock(fd, libc::LOCK_EX) };
        if ret == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

// Single-writer only off unix.
#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
impl Drop for ArchiveLock {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;

        let fd = self.file.as_raw_fd();
        // SAFETY: `fd` is owned by `self.file`, which is still open. A
        // failed unlock is harmless: closing the fd releases it anyway.
        unsafe {
            libc::flock(fd, libc::LOCK_UN);
        }
        tracing::debug!("Released archive lock {}", self.lock_path.display());
    }
}
