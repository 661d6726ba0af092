use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{is_valid_key, KeyValueStore, StorageError};

/// One JSON file per key under a directory.
///
/// Writes go to a temp file that is renamed over the target, under an
/// exclusive advisory lock on `<key>.lock`, so a reader never sees a torn
/// value and two processes never interleave writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn lock_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", key))
    }

    fn check_key(key: &str) -> Result<(), StorageError> {
        if is_valid_key(key) {
            Ok(())
        } else {
            Err(StorageError::InvalidKey {
                key: key.to_string(),
            })
        }
    }

    fn open_lock(&self, key: &str) -> Result<File, StorageError> {
        let path = self.lock_path(key);
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| StorageError::Io { path, source })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Self::check_key(key)?;
        let path = self.slot_path(key);
        if !self.dir.exists() {
            return Ok(None);
        }

        let lock = self.open_lock(key)?;
        FileExt::lock_shared(&lock).map_err(io_error(&self.lock_path(key)))?;
        let _unlock = scopeguard::guard(lock, |lock| {
            let _ = FileExt::unlock(&lock);
        });

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        Self::check_key(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let lock = self.open_lock(key)?;
        FileExt::lock_exclusive(&lock).map_err(io_error(&self.lock_path(key)))?;
        let _unlock = scopeguard::guard(lock, |lock| {
            let _ = FileExt::unlock(&lock);
        });

        let path = self.slot_path(key);
        let tmp_path = self.dir.join(format!("{}.json.tmp", key));
        {
            let mut tmp = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
            tmp.write_all(value).map_err(io_error(&tmp_path))?;
            tmp.sync_all().map_err(io_error(&tmp_path))?;
        }
        fs::rename(&tmp_path, &path).map_err(io_error(&path))?;

        tracing::trace!(key, bytes = value.len(), path = %path.display(), "Slot written");
        Ok(())
    }
}
