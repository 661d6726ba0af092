//! Durable key-value slot the catalog persists into.
//!
//! The store only needs `get` and `set` on whole byte blobs, so the backing
//! medium is injected: [`FileStore`] for the CLI, [`MemoryStore`] for tests
//! and throwaway sessions.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key '{key}': only [A-Za-z0-9._-] allowed")]
    InvalidKey { key: String },
}

/// Byte-oriented key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing was ever written under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the whole value under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// Keys double as file names, so they are restricted to a safe alphabet.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
