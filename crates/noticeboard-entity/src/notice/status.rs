//! Notice status and lifecycle transition outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a notice. The only transition is `Pending → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStatus {
    /// Still open.
    #[default]
    Pending,
    /// Done; terminal.
    Completed,
}

impl NoticeStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown notice status '{other}'")),
        }
    }
}

/// Result of asking the store to complete a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompleteOutcome {
    /// The notice moved from pending to completed.
    Completed,
    /// The notice exists but was already completed; nothing changed.
    AlreadyCompleted,
    /// No notice has that id.
    NotFound,
}

impl CompleteOutcome {
    /// Whether a document was actually modified.
    pub fn modified(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
