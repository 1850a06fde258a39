//! # noticeboard-service
//!
//! Business logic for the notice board. [`IngestionService`] is the only
//! way notices come into existence; [`NoticeService`] reads and mutates
//! them afterwards.
//!
//! Services follow constructor injection: the store, the collaborators and
//! the upload area are handed in as `Arc`s at startup.

pub mod ingestion;
pub mod notice;

pub use ingestion::{
    CreatedNotice, DraftOutcome, ImageNotice, ImageUpload, IngestionService, IngestionSettings,
    normalize_ocr_text,
};
pub use notice::NoticeService;
