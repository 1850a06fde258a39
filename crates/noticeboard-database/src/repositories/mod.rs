//! PostgreSQL repository implementations.

pub mod notice;

pub use notice::PgNoticeRepository;
