//! Upload API routes
//!
//! - `POST /api/v1/uploads` - Multipart image upload (field `file`), returns `{ url }`

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::commands::{UploadImageCommand, UploadImageError};
use crate::{
    api::response::ErrorResponse, error::AppError, features::shared::error_helpers,
    middleware::AuthUser, storage::Storage,
};

pub fn uploads_routes(max_bytes: usize) -> Router<Storage> {
    Router::new()
        .route("/", post(upload_image))
        .layer(DefaultBodyLimit::max(max_bytes))
}

/// # Response
///
/// - `200 OK` - `{ "url": "<public URL>" }`
/// - `400 Bad Request` - No file part, empty filename or disallowed type
/// - `500 Internal Server Error` - Storage failure
#[tracing::instrument(skip(storage, multipart), fields(user_id = %user.user_id))]
async fn upload_image(
    State(storage): State<Storage>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Response, UploadApiError> {
    let mut command: Option<UploadImageCommand> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadApiError::Multipart(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| UploadApiError::Multipart(e.body_text()))?;

        command = Some(UploadImageCommand {
            filename,
            content: content.to_vec(),
            content_type,
        });
        break;
    }

    let command = command.ok_or(UploadApiError::NoFilePart)?;
    let response = super::commands::upload_image::handle(storage, command).await?;

    Ok(Json(json!({ "url": response.url })).into_response())
}

#[derive(Debug)]
enum UploadApiError {
    Auth(AppError),
    NoFilePart,
    Multipart(String),
    Upload(UploadImageError),
}

impl From<AppError> for UploadApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<UploadImageError> for UploadApiError {
    fn from(err: UploadImageError) -> Self {
        Self::Upload(err)
    }
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        match self {
            UploadApiError::Auth(err) => err.into_response(),
            UploadApiError::NoFilePart => error_helpers::validation_error("No file part"),
            UploadApiError::Multipart(message) => error_helpers::validation_error(message),
            UploadApiError::Upload(UploadImageError::Storage(e)) => {
                tracing::error!(error = ?e, "Image upload to storage failed");
                ErrorResponse::new("STORAGE_ERROR", "Failed to upload file to cloud storage")
                    .into_response_with(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
            },
            UploadApiError::Upload(err) => error_helpers::validation_error(err.to_string()),
        }
    }
}
