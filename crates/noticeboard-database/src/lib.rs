//! # noticeboard-database
//!
//! The notice store: a single [`NoticeStore`] trait with a PostgreSQL
//! repository and an in-process memory store behind it. [`StoreManager`]
//! picks the implementation from configuration at startup.

pub mod connection;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use manager::StoreManager;
pub use memory::MemoryNoticeStore;
pub use repositories::PgNoticeRepository;
pub use store::NoticeStore;
