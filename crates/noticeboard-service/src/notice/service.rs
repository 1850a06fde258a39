//! Notice service: list, get, remove and complete.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use noticeboard_core::error::AppError;
use noticeboard_core::result::AppResult;
use noticeboard_core::types::NoticeId;
use noticeboard_database::NoticeStore;
use noticeboard_entity::notice::{CompleteOutcome, Notice};

/// Operations on notices that already exist.
///
/// Absence is reported as a value (`bool`, [`CompleteOutcome`]); errors are
/// kept for genuine store faults.
#[derive(Debug, Clone)]
pub struct NoticeService {
    store: Arc<dyn NoticeStore>,
}

impl NoticeService {
    /// Creates a new notice service.
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }

    /// Notices visible to `user_id`, oldest first.
    ///
    /// A missing or blank `user_id` lists everything.
    pub async fn list(&self, user_id: Option<&str>) -> AppResult<Vec<Notice>> {
        let viewer = user_id.map(str::trim).filter(|u| !u.is_empty());
        self.store.list_visible(viewer).await
    }

    /// A single notice.
    pub async fn get(&self, id: NoticeId) -> AppResult<Notice> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Notice not found"))
    }

    /// Delete a notice. `false` when nothing had that id.
    pub async fn remove(&self, id: NoticeId) -> AppResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(notice_id = %id, "Notice deleted");
        }
        Ok(deleted)
    }

    /// Mark a notice completed today (UTC).
    pub async fn complete(&self, id: NoticeId) -> AppResult<CompleteOutcome> {
        self.complete_on(id, Utc::now().date_naive()).await
    }

    /// Mark a notice completed on `day`.
    pub async fn complete_on(&self, id: NoticeId, day: NaiveDate) -> AppResult<CompleteOutcome> {
        let outcome = self.store.complete(id, day).await?;
        if outcome.modified() {
            info!(notice_id = %id, completed_date = %day, "Notice completed");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use noticeboard_core::error::ErrorKind;
    use noticeboard_database::MemoryNoticeStore;
    use noticeboard_entity::notice::{NewNotice, NoticeStatus};

    use super::*;

    async fn seeded() -> (Arc<MemoryNoticeStore>, NoticeService) {
        let store = Arc::new(MemoryNoticeStore::new());
        for (title, owner) in [("mine", Some("u1")), ("shared", None), ("theirs", Some("u2"))] {
            let new = NewNotice::new(title, "details")
                .unwrap()
                .owned_by(owner.map(String::from));
            store.insert(new).await.unwrap();
        }
        let service = NoticeService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn test_list_union_and_blank_filter() {
        let (_store, service) = seeded().await;

        let titles: Vec<String> = service
            .list(Some("u1"))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["mine", "shared"]);

        assert_eq!(service.list(None).await.unwrap().len(), 3);
        assert_eq!(service.list(Some("")).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_store, service) = seeded().await;
        let err = service.get(NoticeId::new()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Notice not found");
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let (_store, service) = seeded().await;
        let id = service.list(None).await.unwrap()[0].id;
        assert!(service.remove(id).await.unwrap());
        assert!(!service.remove(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_complete_stamps_date_once() {
        let (_store, service) = seeded().await;
        let id = service.list(None).await.unwrap()[0].id;
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        assert_eq!(service.complete_on(id, day).await.unwrap(), CompleteOutcome::Completed);
        assert_eq!(
            service.complete(id).await.unwrap(),
            CompleteOutcome::AlreadyCompleted
        );
        assert_eq!(
            service.complete(NoticeId::new()).await.unwrap(),
            CompleteOutcome::NotFound
        );

        let notice = service.get(id).await.unwrap();
        assert_eq!(notice.status, NoticeStatus::Completed);
        assert_eq!(notice.completed_date, Some(day));
    }
}
