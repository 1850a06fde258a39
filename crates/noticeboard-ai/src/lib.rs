//! # noticeboard-ai
//!
//! Implementations of the enrichment collaborators defined in
//! `noticeboard-core::traits`:
//!
//! - **extractive** summarizer and **keyword** priority classifier, small
//!   built-in stand-ins that need no external service
//! - **disabled** OCR, which never reads anything
//! - **http** clients for each collaborator, talking JSON to a sidecar
//!
//! [`EnrichmentManager`] builds the configured set at startup.

pub mod disabled;
pub mod extractive;
pub mod http;
pub mod keyword;
pub mod manager;

pub use disabled::DisabledOcr;
pub use extractive::ExtractiveSummarizer;
pub use http::{HttpOcrEngine, HttpPriorityClassifier, HttpSummarizer};
pub use keyword::KeywordPriorityClassifier;
pub use manager::EnrichmentManager;
