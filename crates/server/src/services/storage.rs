use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse JSON '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Held while writing; obtained from [`JsonStorage::lock`].
pub type WriteGuard<'a> = MutexGuard<'a, ()>;

/// Flat-file JSON documents under one data directory.
///
/// Every write goes through a single process-wide lock: callers take the
/// guard with [`JsonStorage::lock`] and pass it to [`JsonStorage::write`],
/// keeping read-modify-write cycles serialized.
pub struct JsonStorage {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the document called `name` (`<root>/<name>.json`).
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name))
    }

    pub async fn lock(&self) -> WriteGuard<'_> {
        self.write_lock.lock().await
    }

    /// Read and parse a document. Returns `Ok(None)` if it does not exist.
    pub async fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StorageError> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Io {
                    operation: "Failed to read",
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|e| StorageError::Parse {
                path: path.display().to_string(),
                source: e,
            })
    }

    /// Replace a document atomically using temp file + rename.
    pub async fn write<T: Serialize + ?Sized>(
        &self,
        _guard: &WriteGuard<'_>,
        path: &Path,
        value: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(value)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io {
                    operation: "Failed to create data directory",
                    path: parent.display().to_string(),
                    source: e,
                })?;
        }

        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = tokio::fs::write(&tmp_path, &json).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StorageError::Io {
                operation: "Failed to write temp file",
                path: tmp_path.display().to_string(),
                source: e,
            });
        }

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| StorageError::Io {
                operation: "Failed to rename",
                path: path.display().to_string(),
                source: e,
            })
    }

    /// Move an unreadable document aside to `<name>.json.corrupt` so the next
    /// write does not replace it. Returns the new path.
    pub async fn quarantine(
        &self,
        _guard: &WriteGuard<'_>,
        path: &Path,
    ) -> Result<PathBuf, StorageError> {
        let target = path.with_extension("json.corrupt");
        tokio::fs::rename(path, &target)
            .await
            .map_err(|e| StorageError::Io {
                operation: "Failed to move aside",
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(target)
    }

    /// Delete a document. Returns whether a file was removed.
    pub async fn remove(&self, _guard: &WriteGuard<'_>, path: &Path) -> Result<bool, StorageError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io {
                operation: "Failed to remove",
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());

        let value: Option<Vec<u32>> = storage.read(&storage.document_path("nobody")).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("nested"));
        let path = storage.document_path("numbers");

        let guard = storage.lock().await;
        storage.write(&guard, &path, &vec![1u32, 2, 3]).await.unwrap();
        drop(guard);

        let value: Option<Vec<u32>> = storage.read(&path).await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());
        let path = storage.document_path("broken");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Option<Vec<u32>>, _> = storage.read(&path).await;
        assert!(matches!(result, Err(StorageError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());
        let path = storage.document_path("gone");
        std::fs::write(&path, "[]").unwrap();

        let guard = storage.lock().await;
        assert!(storage.remove(&guard, &path).await.unwrap());
        assert!(!storage.remove(&guard, &path).await.unwrap());
    }
}
