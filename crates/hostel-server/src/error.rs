//! Server-wide error type for cross-cutting failures
//!
//! Feature slices define their own `…Error` enums and map them in their
//! routes. [`AppError`] covers what sits outside any slice: identity
//! extraction, health checks, and startup.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Database(ref e) => {
                tracing::error!(error = ?e, "Database error");
                ErrorResponse::new("INTERNAL_ERROR", "A database error occurred")
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            },
            AppError::NotFound(message) => ErrorResponse::new("NOT_FOUND", message),
            AppError::Unauthorized(message) => ErrorResponse::new("UNAUTHORIZED", message),
            AppError::Forbidden(message) => ErrorResponse::new("FORBIDDEN", message),
            AppError::Unavailable(message) => ErrorResponse::new("SERVICE_UNAVAILABLE", message),
        };

        (status, Json(body)).into_response()
    }
}
