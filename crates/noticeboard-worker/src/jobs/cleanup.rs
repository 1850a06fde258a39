//! Upload retention sweep.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use noticeboard_core::config::UploadsConfig;
use noticeboard_core::result::AppResult;
use noticeboard_storage::UploadStorage;

/// Removes uploaded images older than the retention window.
#[derive(Debug, Clone)]
pub struct UploadSweep {
    uploads: Arc<UploadStorage>,
    /// `None` keeps uploads forever.
    retention: Option<Duration>,
}

impl UploadSweep {
    /// Create a sweep with an explicit retention window.
    pub fn new(uploads: Arc<UploadStorage>, retention: Option<Duration>) -> Self {
        Self { uploads, retention }
    }

    /// Create a sweep from the upload settings. `retention_hours = 0`
    /// disables it.
    pub fn from_config(uploads: Arc<UploadStorage>, config: &UploadsConfig) -> Self {
        let retention = match config.retention_hours {
            0 => None,
            hours => i64::try_from(hours).ok().and_then(Duration::try_hours),
        };
        Self::new(uploads, retention)
    }

    /// Whether running the sweep can remove anything.
    pub fn is_enabled(&self) -> bool {
        self.retention.is_some()
    }

    /// Sweep relative to the current time.
    pub async fn run(&self) -> AppResult<u64> {
        self.run_at(Utc::now()).await
    }

    /// Sweep relative to `now`. Returns the number of files removed.
    pub async fn run_at(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let Some(retention) = self.retention else {
            return Ok(0);
        };
        let cutoff = now - retention;
        let removed = self.uploads.remove_older_than(cutoff).await?;
        info!(removed, cutoff = %cutoff, "Upload sweep finished");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    async fn uploads(dir: &tempfile::TempDir) -> Arc<UploadStorage> {
        Arc::new(UploadStorage::new(dir.path()).await.unwrap())
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let storage = uploads(&dir).await;
        storage.save("a.png", &Bytes::from_static(b"a")).await.unwrap();
        storage.save("b.png", &Bytes::from_static(b"b")).await.unwrap();

        let sweep = UploadSweep::new(Arc::clone(&storage), Some(Duration::hours(24)));

        assert_eq!(sweep.run().await.unwrap(), 0);
        assert_eq!(storage.list().await.unwrap().len(), 2);

        let removed = sweep.run_at(Utc::now() + Duration::hours(25)).await.unwrap();
        assert_eq!(removed, 2);
        assert!(storage.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_retention_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let storage = uploads(&dir).await;
        storage.save("a.png", &Bytes::from_static(b"a")).await.unwrap();

        let config = UploadsConfig {
            retention_hours: 0,
            ..UploadsConfig::default()
        };
        let sweep = UploadSweep::from_config(Arc::clone(&storage), &config);

        assert!(!sweep.is_enabled());
        let removed = sweep.run_at(Utc::now() + Duration::days(365)).await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(storage.list().await.unwrap().len(), 1);
    }
}
