//! Landlord API routes
//!
//! - `POST /api/v1/landlords` - Register a landlord profile for the caller
//! - `GET /api/v1/landlords/me` - The caller's landlord profile

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hostel_common::types::UserRole;
use sqlx::PgPool;

use super::{
    commands::{RegisterLandlordCommand, RegisterLandlordError},
    queries::{GetMyLandlordError, GetMyLandlordQuery},
};
use crate::{
    api::response::ApiResponse, error::AppError, features::shared::error_helpers,
    middleware::AuthUser,
};

pub fn landlords_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(register_landlord))
        .route("/me", get(my_landlord))
}

/// # Response
///
/// - `201 Created` - Profile created
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Caller already has a profile
#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn register_landlord(
    State(pool): State<PgPool>,
    user: AuthUser,
    Json(mut command): Json<RegisterLandlordCommand>,
) -> Result<Response, LandlordApiError> {
    command.user_id = user.user_id;

    let landlord = super::commands::register::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(landlord))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn my_landlord(
    State(pool): State<PgPool>,
    user: AuthUser,
) -> Result<Response, LandlordApiError> {
    user.require_role(UserRole::Landlord)?;

    let landlord = super::queries::me::handle(
        pool,
        GetMyLandlordQuery {
            user_id: user.user_id,
        },
    )
    .await?;

    Ok(ApiResponse::success(landlord).into_response())
}

#[derive(Debug)]
enum LandlordApiError {
    Auth(AppError),
    Register(RegisterLandlordError),
    Me(GetMyLandlordError),
}

impl From<AppError> for LandlordApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<RegisterLandlordError> for LandlordApiError {
    fn from(err: RegisterLandlordError) -> Self {
        Self::Register(err)
    }
}

impl From<GetMyLandlordError> for LandlordApiError {
    fn from(err: GetMyLandlordError) -> Self {
        Self::Me(err)
    }
}

impl IntoResponse for LandlordApiError {
    fn into_response(self) -> Response {
        match self {
            LandlordApiError::Auth(err) => err.into_response(),

            LandlordApiError::Register(RegisterLandlordError::Database(e)) => {
                error_helpers::database_error("landlord registration", &e)
            },
            LandlordApiError::Register(err @ RegisterLandlordError::AlreadyRegistered) => {
                error_helpers::conflict(err.to_string())
            },
            LandlordApiError::Register(err) => error_helpers::validation_error(err.to_string()),

            LandlordApiError::Me(err @ GetMyLandlordError::NotFound) => {
                error_helpers::not_found(err.to_string())
            },
            LandlordApiError::Me(GetMyLandlordError::Database(e)) => {
                error_helpers::database_error("landlord lookup", &e)
            },
        }
    }
}
