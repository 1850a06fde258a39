//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use noticeboard_core::config::AppConfig;
use noticeboard_database::NoticeStore;
use noticeboard_service::{IngestionService, NoticeService};
use noticeboard_storage::UploadStorage;
use noticeboard_worker::FeederSupervisor;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Notice store, for health checks
    pub store: Arc<dyn NoticeStore>,
    /// Upload area, for health checks
    pub uploads: Arc<UploadStorage>,
    /// Ingestion pipeline
    pub ingestion: Arc<IngestionService>,
    /// Notice operations
    pub notices: Arc<NoticeService>,
    /// Background feeders
    pub feeders: Arc<FeederSupervisor>,
    /// Process start, for uptime
    pub started_at: Instant,
}
