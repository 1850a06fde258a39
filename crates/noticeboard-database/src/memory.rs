//! In-process notice store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use noticeboard_core::error::AppError;
use noticeboard_core::result::AppResult;
use noticeboard_core::types::NoticeId;
use noticeboard_entity::notice::{CompleteOutcome, NewNotice, Notice, NoticeSource};

use crate::store::NoticeStore;

/// Notice store kept in memory, in insertion order.
///
/// Used for development and tests. All writes take the lock, so the
/// pending-to-completed check and update happen atomically.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoticeStore {
    notices: Arc<RwLock<Vec<Notice>>>,
}

impl MemoryNoticeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notices.
    pub async fn len(&self) -> usize {
        self.notices.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.notices.read().await.is_empty()
    }
}

#[async_trait]
impl NoticeStore for MemoryNoticeStore {
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice> {
        let mut notices = self.notices.write().await;

        if let (Some(source), Some(external_ref)) = (notice.source, notice.external_ref.as_deref()) {
            let taken = notices.iter().any(|n| {
                n.source == Some(source) && n.external_ref.as_deref() == Some(external_ref)
            });
            if taken {
                return Err(AppError::conflict("A notice from this origin already exists"));
            }
        }

        let stored = Notice::from_new(NoticeId::new(), notice, Utc::now());
        debug!(notice_id = %stored.id, "Inserted notice into memory store");
        notices.push(stored.clone());
        Ok(stored)
    }

    async fn list_visible(&self, viewer: Option<&str>) -> AppResult<Vec<Notice>> {
        let notices = self.notices.read().await;
        Ok(notices
            .iter()
            .filter(|n| n.is_visible_to(viewer))
            .cloned()
            .collect())
    }

    async fn get(&self, id: NoticeId) -> AppResult<Option<Notice>> {
        let notices = self.notices.read().await;
        Ok(notices.iter().find(|n| n.id == id).cloned())
    }

    async fn delete(&self, id: NoticeId) -> AppResult<bool> {
        let mut notices = self.notices.write().await;
        let before = notices.len();
        notices.retain(|n| n.id != id);
        Ok(notices.len() < before)
    }

    async fn complete(&self, id: NoticeId, on: NaiveDate) -> AppResult<CompleteOutcome> {
        let mut notices = self.notices.write().await;
        Ok(match notices.iter_mut().find(|n| n.id == id) {
            Some(notice) => notice.complete(on),
            None => CompleteOutcome::NotFound,
        })
    }

    async fn find_by_external_ref(
        &self,
        source: NoticeSource,
        external_ref: &str,
    ) -> AppResult<Option<Notice>> {
        let notices = self.notices.read().await;
        Ok(notices
            .iter()
            .find(|n| n.source == Some(source) && n.external_ref.as_deref() == Some(external_ref))
            .cloned())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
