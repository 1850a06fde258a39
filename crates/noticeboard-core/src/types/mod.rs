//! Core type definitions used across the noticeboard workspace.

pub mod id;
pub mod priority;

pub use id::NoticeId;
pub use priority::{Priority, PriorityAssessment};
