//! Collaborator traits defined in `noticeboard-core` and implemented by
//! `noticeboard-ai` (and by test doubles).

pub mod enrichment;

pub use enrichment::{OcrEngine, PriorityClassifier, Summarizer};
