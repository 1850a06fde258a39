//! Local filesystem upload area.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use noticeboard_core::error::{AppError, ErrorKind};
use noticeboard_core::result::AppResult;

use crate::naming::upload_name;

/// A file just written to the upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Stored name, `<uuid-hex>_<basename>`.
    pub name: String,
    /// Absolute or root-relative path of the stored file.
    pub path: PathBuf,
    /// Bytes written.
    pub size_bytes: u64,
}

/// A file found when listing the upload area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    /// File name within the area.
    pub name: String,
    /// Size on disk.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Directory where uploaded images are kept until swept.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Open the upload area, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload directory: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The upload directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` under a fresh collision-resistant name derived from
    /// `filename`. Never overwrites an existing file.
    pub async fn save(&self, filename: &str, data: &Bytes) -> AppResult<StoredUpload> {
        let name = upload_name(filename);
        let path = self.root.join(&name);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create upload: {name}"),
                    e,
                )
            })?;

        file.write_all(data)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to write upload", e))?;
        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush upload", e))?;

        debug!(name = %name, bytes = data.len(), "Saved upload");
        Ok(StoredUpload {
            name,
            path,
            size_bytes: data.len() as u64,
        })
    }

    /// List regular files in the upload area, oldest first.
    pub async fn list(&self) -> AppResult<Vec<UploadEntry>> {
        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list upload directory: {}", self.root.display()),
                e,
            )
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;
            if !meta.is_file() {
                continue;
            }
            let modified = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            entries.push(UploadEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size_bytes: meta.len(),
                modified,
            });
        }

        entries.sort_by(|a, b| a.modified.cmp(&b.modified).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    /// Delete one upload by name. Missing files are not an error.
    pub async fn remove(&self, name: &str) -> AppResult<bool> {
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(AppError::validation(format!("Invalid upload name: {name}")));
        }
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete upload: {name}"),
                e,
            )),
        }
    }

    /// Delete every upload last modified before `cutoff`. Returns how many
    /// were removed; individual failures are logged and skipped.
    pub async fn remove_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        for entry in self.list().await? {
            if entry.modified >= cutoff {
                continue;
            }
            match self.remove(&entry.name).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(name = %entry.name, error = %e, "Failed to remove expired upload"),
            }
        }
        Ok(removed)
    }

    /// Whether the upload directory is present.
    pub async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn storage() -> (tempfile::TempDir, UploadStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = UploadStorage::new(dir.path().join("uploads")).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_save_creates_distinct_files() {
        let (_dir, storage) = storage().await;
        let data = Bytes::from_static(b"\x89PNG fake");

        let a = storage.save("board.png", &data).await.unwrap();
        let b = storage.save("board.png", &data).await.unwrap();

        assert_ne!(a.name, b.name);
        assert_eq!(a.size_bytes, data.len() as u64);
        assert_eq!(fs::read(&a.path).await.unwrap(), data.to_vec());
        assert_eq!(storage.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_keeps_files_inside_root() {
        let (_dir, storage) = storage().await;
        let stored = storage
            .save("../../escape.png", &Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert_eq!(stored.path.parent(), Some(storage.root()));
        assert!(stored.name.ends_with("_escape.png"));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, storage) = storage().await;
        let stored = storage.save("a.jpg", &Bytes::from_static(b"a")).await.unwrap();
        assert!(storage.remove(&stored.name).await.unwrap());
        assert!(!storage.remove(&stored.name).await.unwrap());
        assert!(storage.remove("../a.jpg").await.is_err());
    }

    #[tokio::test]
    async fn test_remove_older_than_respects_cutoff() {
        let (_dir, storage) = storage().await;
        storage.save("a.jpg", &Bytes::from_static(b"a")).await.unwrap();
        storage.save("b.jpg", &Bytes::from_static(b"b")).await.unwrap();

        let past = Utc::now() - Duration::hours(1);
        assert_eq!(storage.remove_older_than(past).await.unwrap(), 0);
        assert_eq!(storage.list().await.unwrap().len(), 2);

        let future = Utc::now() + Duration::hours(1);
        assert_eq!(storage.remove_older_than(future).await.unwrap(), 2);
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, storage) = storage().await;
        assert!(storage.health_check().await.unwrap());
    }
}
