//! Creation requests produced by background feeders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::source::NoticeSource;

/// A notice a feeder wants created. It goes through the same validation and
/// enrichment as a manual notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeDraft {
    /// Proposed title.
    pub title: String,
    /// Proposed body (summarized before storage).
    pub description: String,
    /// Owner, or `None` for a broadcast notice.
    pub user_id: Option<String>,
    /// Provenance tag.
    pub source: Option<NoticeSource>,
    /// Identifier of the item at its origin; used to skip re-deliveries.
    pub external_ref: Option<String>,
    /// Deadline to use when the classifier finds none (e.g. an event start).
    pub deadline_hint: Option<DateTime<Utc>>,
}

impl NoticeDraft {
    /// Create a draft with only title and description set.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            user_id: None,
            source: None,
            external_ref: None,
            deadline_hint: None,
        }
    }

    /// Set the owner.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Set the provenance tag and origin identifier.
    pub fn with_origin(mut self, source: NoticeSource, external_ref: impl Into<String>) -> Self {
        self.source = Some(source);
        self.external_ref = Some(external_ref.into());
        self
    }

    /// Set the fallback deadline.
    pub fn with_deadline_hint(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline_hint = deadline;
        self
    }
}
