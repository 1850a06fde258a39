//! Reading and mutating stored notices.

pub mod service;

pub use service::NoticeService;
