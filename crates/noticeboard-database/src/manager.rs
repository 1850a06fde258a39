//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use noticeboard_core::config::DatabaseConfig;
use noticeboard_core::error::AppError;
use noticeboard_core::result::AppResult;
use noticeboard_core::types::NoticeId;
use noticeboard_entity::notice::{CompleteOutcome, NewNotice, Notice, NoticeSource};

use crate::connection::DatabasePool;
use crate::memory::MemoryNoticeStore;
use crate::migration::run_migrations;
use crate::repositories::PgNoticeRepository;
use crate::store::NoticeStore;

/// Notice store selected from configuration at startup.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn NoticeStore>,
    pool: Option<DatabasePool>,
}

impl StoreManager {
    /// Build the configured store, connecting and migrating when it is PostgreSQL.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL notice store");
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                let repo = PgNoticeRepository::new(pool.pool().clone());
                Ok(Self {
                    inner: Arc::new(repo),
                    pool: Some(pool),
                })
            }
            "memory" => {
                info!("Initializing in-memory notice store");
                Ok(Self::from_store(Arc::new(MemoryNoticeStore::new())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// Wrap an existing store (for tests).
    pub fn from_store(store: Arc<dyn NoticeStore>) -> Self {
        Self {
            inner: store,
            pool: None,
        }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<dyn NoticeStore> {
        Arc::clone(&self.inner)
    }

    /// The PostgreSQL pool, when that provider is active.
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[async_trait]
impl NoticeStore for StoreManager {
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice> {
        self.inner.insert(notice).await
    }

    async fn list_visible(&self, viewer: Option<&str>) -> AppResult<Vec<Notice>> {
        self.inner.list_visible(viewer).await
    }

    async fn get(&self, id: NoticeId) -> AppResult<Option<Notice>> {
        self.inner.get(id).await
    }

    async fn delete(&self, id: NoticeId) -> AppResult<bool> {
        self.inner.delete(id).await
    }

    async fn complete(&self, id: NoticeId, on: NaiveDate) -> AppResult<CompleteOutcome> {
        self.inner.complete(id, on).await
    }

    async fn find_by_external_ref(
        &self,
        source: NoticeSource,
        external_ref: &str,
    ) -> AppResult<Option<Notice>> {
        self.inner.find_by_external_ref(source, external_ref).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
