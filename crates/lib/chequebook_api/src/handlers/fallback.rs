//! Fallbacks for unmatched routes and methods.

use crate::error::AppError;

/// Any path without a route.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}

/// A known path called with a method it does not serve.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
