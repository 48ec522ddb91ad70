// Process-level store locking

use crate::error::Result;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use tracing::debug;

/// Exclusive advisory lock over a store directory, held for the life of a
/// session. Mutations are read-modify-write sequences over shared entries,
/// so concurrent processes must not interleave them.
///
/// The lock is released when the guard is dropped.
pub struct SessionLock {
    _file: File,
}

impl SessionLock {
    /// Block until the directory's lock file can be acquired exclusively.
    pub fn acquire<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join("diddit.lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        file.lock_exclusive()?;
        debug!(path = %path.display(), "Session lock acquired");

        Ok(Self { _file: file })
    }
}
