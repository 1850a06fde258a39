//! # noticeboard-api
//!
//! HTTP API layer for the notice board built on Axum.
//!
//! Provides the `/api/notices` endpoints, the health check, middleware
//! (CORS, request logging, body limit), DTOs and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
