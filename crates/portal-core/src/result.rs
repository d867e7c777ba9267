//! Convenience result type alias for the support portal.

use crate::error::AppError;

/// A specialized `Result` type for portal operations.
pub type AppResult<T> = Result<T, AppError>;
