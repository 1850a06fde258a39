//! Notice domain entities.

pub mod draft;
pub mod model;
pub mod source;
pub mod status;

pub use draft::NoticeDraft;
pub use model::{NewNotice, Notice};
pub use source::NoticeSource;
pub use status::{CompleteOutcome, NoticeStatus};
