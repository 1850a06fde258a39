//! # noticeboard-core
//!
//! Core crate for the notice board backend. Contains the unified error
//! system, configuration schemas, typed identifiers, the priority label set,
//! and the collaborator traits (summarizer, priority classifier, OCR).
//!
//! This crate has **no** internal dependencies on other noticeboard crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
