//! Scheduled maintenance jobs.

pub mod cleanup;

pub use cleanup::UploadSweep;
