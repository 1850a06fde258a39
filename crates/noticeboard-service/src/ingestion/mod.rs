//! The ingestion pipeline: validation, enrichment and persistence.

pub mod guard;
pub mod normalize;
pub mod service;

pub use normalize::normalize_ocr_text;
pub use service::{
    CreatedNotice, DraftOutcome, ImageNotice, ImageUpload, IngestionService, IngestionSettings,
};
