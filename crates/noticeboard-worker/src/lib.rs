//! Background work for the notice board.
//!
//! This crate provides:
//! - Feeders that turn incoming email and upcoming calendar events into
//!   notices, run under a restarting [`FeederSupervisor`]
//! - A cron scheduler for periodic maintenance
//! - The upload retention sweep

pub mod feeder;
pub mod jobs;
pub mod scheduler;

pub use feeder::{FeedError, Feeder, FeederStatus, FeederSupervisor, build_feeders};
pub use jobs::UploadSweep;
pub use scheduler::CronScheduler;
