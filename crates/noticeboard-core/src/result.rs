//! Convenience result type alias for the notice board.

use crate::error::AppError;

/// A specialized `Result` type for notice board operations.
pub type AppResult<T> = Result<T, AppError>;
