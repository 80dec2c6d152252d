//! Database and response error helpers shared by the feature routes

use axum::{http::StatusCode, response::Response};
use sqlx::Error as SqlxError;

use crate::api::response::ErrorResponse;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Map a unique violation to `unique_error`, anything else through `default_wrapper`.
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

pub fn validation_error(message: impl Into<String>) -> Response {
    ErrorResponse::new("VALIDATION_ERROR", message).into_response_with(StatusCode::BAD_REQUEST)
}

pub fn not_found(message: impl Into<String>) -> Response {
    ErrorResponse::new("NOT_FOUND", message).into_response_with(StatusCode::NOT_FOUND)
}

pub fn forbidden(message: impl Into<String>) -> Response {
    ErrorResponse::new("FORBIDDEN", message).into_response_with(StatusCode::FORBIDDEN)
}

pub fn conflict(message: impl Into<String>) -> Response {
    ErrorResponse::new("CONFLICT", message).into_response_with(StatusCode::CONFLICT)
}

/// Log the underlying database error and answer with a generic 500.
pub fn database_error(context: &str, error: &SqlxError) -> Response {
    tracing::error!(error = ?error, "Database error during {}", context);
    ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}
