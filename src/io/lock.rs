//! Advisory file lock for the data directory.
//!
//! The board has a single writer by design, but nothing stops a CLI
//! invocation from running while the TUI is open. Both take this lock
//! around load-mutate-save so their whole-blob writes serialize.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another slate process may be writing")]
    Timeout { path: PathBuf },
}

/// Held for the duration of a load-mutate-save cycle; released on drop.
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock, waiting up to `timeout` for a competing process.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::Create {
                path: path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        while try_flock(&file).is_err() {
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(StoreLock { _file: file, path })
    }

    /// Acquire with the default 5-second timeout.
    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(5))
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        // flock releases with the fd; the file itself is just litter
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn try_flock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
