//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use noticeboard_core::error::AppError;

use crate::jobs::UploadSweep;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler })
    }

    /// Register the upload retention sweep on `cron` (six fields, with
    /// seconds). A disabled sweep is not registered.
    pub async fn register_upload_sweep(
        &self,
        sweep: Arc<UploadSweep>,
        cron: &str,
    ) -> Result<(), AppError> {
        if !sweep.is_enabled() {
            tracing::info!("Upload retention disabled; sweep not scheduled");
            return Ok(());
        }

        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let sweep = Arc::clone(&sweep);
            Box::pin(async move {
                tracing::debug!("Running upload sweep");
                if let Err(e) = sweep.run().await {
                    tracing::error!("Upload sweep failed: {}", e);
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid upload sweep schedule '{}': {}", cron, e))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add upload sweep: {}", e)))?;

        tracing::info!("Registered: upload_sweep ({})", cron);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
