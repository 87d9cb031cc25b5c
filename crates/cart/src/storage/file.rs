//! Filesystem storage backend.
//!
//! Each key maps to `<root>/<encoded key>.json`. Keys like
//! `@marketPlace:cart` contain characters that are not portable in file
//! names, so every byte outside `[A-Za-z0-9-_.~]` is percent-encoded.
//!
//! Each write goes to its own uniquely named temp file in the same
//! directory, is flushed to disk, and is then renamed over the target.
//! Readers never observe a partially written cart, and concurrent writers
//! on the same key never share a temp file; the last rename wins.

use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{Storage, StorageError};

/// Storage that keeps one file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory holding the slot files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", urlencoding::encode(key)))
    }
}

/// Write `contents` to `path` through a fresh temp file in `root`.
fn write_atomic(root: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::create_dir_all(root)?;

    let mut tmp = NamedTempFile::new_in(root)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let root = self.root.clone();
        let path = self.path_for(key);
        let target = path.clone();
        let bytes = value.len();

        tokio::task::spawn_blocking(move || write_atomic(&root, &target, value.as_bytes()))
            .await
            .map_err(|e| StorageError::Backend(format!("write task failed: {e}")))?
            .map_err(|e| io_error(key, e))?;

        debug!(key, path = %path.display(), bytes, "Slot written");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, path = %path.display(), "Slot removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
