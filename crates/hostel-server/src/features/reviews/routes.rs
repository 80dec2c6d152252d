//! Review API routes
//!
//! - `POST /api/v1/reviews` - Review a hostel
//! - `GET /api/v1/reviews/hostel/:id` - Reviews of a hostel

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    commands::{CreateReviewCommand, CreateReviewError},
    queries::{ListHostelReviewsError, ListHostelReviewsQuery},
};
use crate::{
    api::response::ApiResponse, error::AppError, features::shared::error_helpers,
    middleware::AuthUser,
};

pub fn reviews_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_review))
        .route("/hostel/:id", get(hostel_reviews))
}

/// # Response
///
/// - `201 Created` - Review stored, landlord rating refreshed
/// - `400 Bad Request` - Rating outside 1-5
/// - `404 Not Found` - Hostel does not exist
/// - `409 Conflict` - Caller already reviewed this hostel
#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn create_review(
    State(pool): State<PgPool>,
    user: AuthUser,
    Json(mut command): Json<CreateReviewCommand>,
) -> Result<Response, ReviewApiError> {
    command.author_id = user.user_id;

    let review = super::commands::create::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(review))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn hostel_reviews(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Query(mut query): Query<ListHostelReviewsQuery>,
) -> Result<Response, ReviewApiError> {
    query.hostel_id = id;

    let page = super::queries::list::handle(pool, query).await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[derive(Debug)]
enum ReviewApiError {
    Auth(AppError),
    Create(CreateReviewError),
    List(ListHostelReviewsError),
}

impl From<AppError> for ReviewApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<CreateReviewError> for ReviewApiError {
    fn from(err: CreateReviewError) -> Self {
        Self::Create(err)
    }
}

impl From<ListHostelReviewsError> for ReviewApiError {
    fn from(err: ListHostelReviewsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ReviewApiError {
    fn into_response(self) -> Response {
        match self {
            ReviewApiError::Auth(err) => err.into_response(),

            ReviewApiError::Create(CreateReviewError::Database(e)) => {
                error_helpers::database_error("review creation", &e)
            },
            ReviewApiError::Create(err @ CreateReviewError::HostelNotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            ReviewApiError::Create(err @ CreateReviewError::OwnHostel) => {
                error_helpers::forbidden(err.to_string())
            },
            ReviewApiError::Create(err @ CreateReviewError::AlreadyReviewed) => {
                error_helpers::conflict(err.to_string())
            },
            ReviewApiError::Create(err) => error_helpers::validation_error(err.to_string()),

            ReviewApiError::List(ListHostelReviewsError::Database(e)) => {
                error_helpers::database_error("review listing", &e)
            },
            ReviewApiError::List(err @ ListHostelReviewsError::HostelNotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            ReviewApiError::List(err) => error_helpers::validation_error(err.to_string()),
        }
    }
}
