//! The notice store contract.

use async_trait::async_trait;
use chrono::NaiveDate;

use noticeboard_core::result::AppResult;
use noticeboard_core::types::NoticeId;
use noticeboard_entity::notice::{CompleteOutcome, NewNotice, Notice, NoticeSource};

/// Persistent collection of notices.
///
/// Implementations assign the id and creation time on insert, keep each
/// notice's completion fields consistent, and make `complete` a single
/// conditional update so concurrent callers see exactly one `Completed`.
#[async_trait]
pub trait NoticeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new notice and return it as stored.
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice>;

    /// Notices visible to `viewer`, oldest first.
    ///
    /// `None` returns every notice. `Some(user)` returns that user's notices
    /// plus those without an owner.
    async fn list_visible(&self, viewer: Option<&str>) -> AppResult<Vec<Notice>>;

    /// Fetch a notice by id.
    async fn get(&self, id: NoticeId) -> AppResult<Option<Notice>>;

    /// Delete a notice. Returns `false` when nothing had that id.
    async fn delete(&self, id: NoticeId) -> AppResult<bool>;

    /// Move a pending notice to completed, stamping `on` as the completion day.
    async fn complete(&self, id: NoticeId, on: NaiveDate) -> AppResult<CompleteOutcome>;

    /// Look up a notice by where it came from.
    async fn find_by_external_ref(
        &self,
        source: NoticeSource,
        external_ref: &str,
    ) -> AppResult<Option<Notice>>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
