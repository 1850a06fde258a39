//! # noticeboard-storage
//!
//! The local upload area where images posted to the board are written
//! before OCR, listed by age, and swept once past retention.

pub mod naming;
pub mod uploads;

pub use naming::{sanitize_filename, upload_name};
pub use uploads::{StoredUpload, UploadEntry, UploadStorage};
