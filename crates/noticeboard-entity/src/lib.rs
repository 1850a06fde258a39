//! # noticeboard-entity
//!
//! Domain entity models for the notice board. [`Notice`](notice::Notice) is
//! the only persisted entity; the other types describe how one is created
//! and how its single lifecycle transition is reported.

pub mod notice;
