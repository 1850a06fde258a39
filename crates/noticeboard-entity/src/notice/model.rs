//! Notice entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use noticeboard_core::error::AppError;
use noticeboard_core::types::{NoticeId, Priority};

use super::source::NoticeSource;
use super::status::{CompleteOutcome, NoticeStatus};

/// A notice on the board.
///
/// `status`, `completed` and `completed_date` always agree: a notice is
/// either pending with no completion date, or completed with one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Store-assigned identifier.
    pub id: NoticeId,
    /// Short title.
    pub title: String,
    /// Body text, possibly summarized.
    pub description: String,
    /// Urgency label.
    pub priority: Priority,
    /// When the notice is due.
    pub deadline: Option<DateTime<Utc>>,
    /// Owner; `None` means visible to everyone.
    pub user_id: Option<String>,
    /// Lifecycle state.
    pub status: NoticeStatus,
    /// Mirror of `status == Completed`.
    pub completed: bool,
    /// Day the notice was completed.
    pub completed_date: Option<NaiveDate>,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
    /// Provenance tag.
    pub source: Option<NoticeSource>,
    /// Identifier of the item at its origin.
    pub external_ref: Option<String>,
}

/// Validated fields for a notice about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotice {
    /// Short title (non-blank).
    pub title: String,
    /// Body text (non-blank).
    pub description: String,
    /// Urgency label.
    pub priority: Priority,
    /// When the notice is due.
    pub deadline: Option<DateTime<Utc>>,
    /// Owner; `None` means visible to everyone.
    pub user_id: Option<String>,
    /// Provenance tag.
    pub source: Option<NoticeSource>,
    /// Identifier of the item at its origin.
    pub external_ref: Option<String>,
}

impl NewNotice {
    /// Build a notice with default priority and no deadline.
    ///
    /// Fails with a validation error when either text field is blank.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Result<Self, AppError> {
        let title = title.into();
        let description = description.into();
        if title.trim().is_empty() || description.trim().is_empty() {
            return Err(AppError::validation("Missing title or description"));
        }
        Ok(Self {
            title,
            description,
            priority: Priority::default(),
            deadline: None,
            user_id: None,
            source: None,
            external_ref: None,
        })
    }

    /// Set the owner. Blank owners are treated as no owner.
    pub fn owned_by(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id.filter(|u| !u.trim().is_empty());
        self
    }

    /// Apply a classifier result.
    pub fn with_priority(mut self, priority: Priority, deadline: Option<DateTime<Utc>>) -> Self {
        self.priority = priority;
        self.deadline = deadline;
        self
    }

    /// Record provenance.
    pub fn with_source(mut self, source: Option<NoticeSource>, external_ref: Option<String>) -> Self {
        self.source = source;
        self.external_ref = external_ref;
        self
    }
}

impl Notice {
    /// Materialize a freshly inserted notice. Always starts pending.
    pub fn from_new(id: NoticeId, new: NewNotice, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            priority: new.priority,
            deadline: new.deadline,
            user_id: new.user_id,
            status: NoticeStatus::Pending,
            completed: false,
            completed_date: None,
            created_at,
            source: new.source,
            external_ref: new.external_ref,
        }
    }

    /// Whether `viewer` may see this notice. With no viewer, everything is
    /// visible; otherwise the viewer's own notices and ownerless ones.
    pub fn is_visible_to(&self, viewer: Option<&str>) -> bool {
        match (viewer, self.user_id.as_deref()) {
            (None, _) => true,
            (Some(_), None) => true,
            (Some(viewer), Some(owner)) => viewer == owner,
        }
    }

    /// Apply the one-way `pending → completed` transition.
    pub fn complete(&mut self, on: NaiveDate) -> CompleteOutcome {
        if self.status.is_terminal() {
            return CompleteOutcome::AlreadyCompleted;
        }
        self.status = NoticeStatus::Completed;
        self.completed = true;
        self.completed_date = Some(on);
        CompleteOutcome::Completed
    }

    /// Check that the three completion fields agree.
    pub fn is_consistent(&self) -> bool {
        let done = self.status == NoticeStatus::Completed;
        done == self.completed && done == self.completed_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(owner: Option<&str>) -> Notice {
        let new = NewNotice::new("Pay rent", "Rent due next Friday")
            .expect("valid")
            .owned_by(owner.map(String::from));
        Notice::from_new(NoticeId::new(), new, Utc::now())
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        assert!(NewNotice::new("", "body").is_err());
        assert!(NewNotice::new("title", "   ").is_err());
        let err = NewNotice::new("", "").unwrap_err();
        assert_eq!(err.message, "Missing title or description");
    }

    #[test]
    fn test_from_new_starts_pending() {
        let notice = sample(None);
        assert_eq!(notice.status, NoticeStatus::Pending);
        assert!(!notice.completed);
        assert!(notice.completed_date.is_none());
        assert_eq!(notice.priority, Priority::Low);
        assert!(notice.is_consistent());
    }

    #[test]
    fn test_complete_is_one_way() {
        let mut notice = sample(None);
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");

        assert_eq!(notice.complete(day), CompleteOutcome::Completed);
        assert!(notice.completed);
        assert_eq!(notice.completed_date, Some(day));
        assert!(notice.is_consistent());

        let later = NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date");
        assert_eq!(notice.complete(later), CompleteOutcome::AlreadyCompleted);
        assert_eq!(notice.completed_date, Some(day));
    }

    #[test]
    fn test_visibility_union_with_ownerless() {
        let shared = sample(None);
        let mine = sample(Some("u1"));
        let theirs = sample(Some("u2"));

        assert!(shared.is_visible_to(Some("u1")));
        assert!(mine.is_visible_to(Some("u1")));
        assert!(!theirs.is_visible_to(Some("u1")));
        assert!(theirs.is_visible_to(None));
    }

    #[test]
    fn test_blank_owner_is_broadcast() {
        let new = NewNotice::new("t", "d")
            .expect("valid")
            .owned_by(Some("  ".to_string()));
        assert!(new.user_id.is_none());
    }
}
