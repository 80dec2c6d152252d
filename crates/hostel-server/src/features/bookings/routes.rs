//! Booking API routes
//!
//! - `POST /api/v1/bookings` - Book a hostel (pending until the landlord confirms)
//! - `GET /api/v1/bookings` - The caller's bookings as a guest
//! - `GET /api/v1/bookings/landlord` - Bookings on the caller's hostels
//! - `GET /api/v1/bookings/:id` - Booking detail
//! - `PATCH /api/v1/bookings/:id/status` - Status transition

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use hostel_common::types::UserRole;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    commands::{
        CreateBookingCommand, CreateBookingError, UpdateBookingStatusCommand,
        UpdateBookingStatusError,
    },
    queries::{
        GetBookingError, GetBookingQuery, ListLandlordBookingsError, ListLandlordBookingsQuery,
        ListMyBookingsError, ListMyBookingsQuery,
    },
};
use crate::{
    api::response::ApiResponse, error::AppError, features::shared::error_helpers,
    middleware::AuthUser,
};

pub fn bookings_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(my_bookings).post(create_booking))
        .route("/landlord", get(landlord_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/status", patch(update_status))
}

/// # Response
///
/// - `201 Created` - Booking created with status `pending`
/// - `400 Bad Request` - Invalid guests or dates
/// - `404 Not Found` - Hostel does not exist
/// - `409 Conflict` - Not enough rooms available
#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn create_booking(
    State(pool): State<PgPool>,
    user: AuthUser,
    Json(mut command): Json<CreateBookingCommand>,
) -> Result<Response, BookingApiError> {
    command.guest_id = user.user_id;

    let booking = super::commands::create::handle(pool, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))).into_response())
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn my_bookings(
    State(pool): State<PgPool>,
    user: AuthUser,
    Query(mut query): Query<ListMyBookingsQuery>,
) -> Result<Response, BookingApiError> {
    query.guest_id = user.user_id;

    let page = super::queries::mine::handle(pool, query).await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn landlord_bookings(
    State(pool): State<PgPool>,
    user: AuthUser,
    Query(mut query): Query<ListLandlordBookingsQuery>,
) -> Result<Response, BookingApiError> {
    user.require_role(UserRole::Landlord)?;
    query.user_id = user.user_id;

    let page = super::queries::landlord::handle(pool, query).await?;

    Ok(
        ApiResponse::success_with_meta(page.items, json!({ "pagination": page.pagination }))
            .into_response(),
    )
}

#[tracing::instrument(skip(pool), fields(user_id = %user.user_id))]
async fn get_booking(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, BookingApiError> {
    let booking = super::queries::get::handle(
        pool,
        GetBookingQuery {
            booking_id: id,
            user_id: user.user_id,
            is_admin: user.is_admin(),
        },
    )
    .await?;

    Ok(ApiResponse::success(booking).into_response())
}

#[tracing::instrument(skip(pool, command), fields(user_id = %user.user_id))]
async fn update_status(
    State(pool): State<PgPool>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateBookingStatusCommand>,
) -> Result<Response, BookingApiError> {
    command.booking_id = id;
    command.user_id = user.user_id;
    command.is_admin = user.is_admin();

    let booking = super::commands::update_status::handle(pool, command).await?;

    Ok(ApiResponse::success(booking).into_response())
}

#[derive(Debug)]
enum BookingApiError {
    Auth(AppError),
    Create(CreateBookingError),
    Status(UpdateBookingStatusError),
    Mine(ListMyBookingsError),
    Landlord(ListLandlordBookingsError),
    Get(GetBookingError),
}

impl From<AppError> for BookingApiError {
    fn from(err: AppError) -> Self {
        Self::Auth(err)
    }
}

impl From<CreateBookingError> for BookingApiError {
    fn from(err: CreateBookingError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateBookingStatusError> for BookingApiError {
    fn from(err: UpdateBookingStatusError) -> Self {
        Self::Status(err)
    }
}

impl From<ListMyBookingsError> for BookingApiError {
    fn from(err: ListMyBookingsError) -> Self {
        Self::Mine(err)
    }
}

impl From<ListLandlordBookingsError> for BookingApiError {
    fn from(err: ListLandlordBookingsError) -> Self {
        Self::Landlord(err)
    }
}

impl From<GetBookingError> for BookingApiError {
    fn from(err: GetBookingError) -> Self {
        Self::Get(err)
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> Response {
        match self {
            BookingApiError::Auth(err) => err.into_response(),

            BookingApiError::Create(CreateBookingError::Database(e)) => {
                error_helpers::database_error("booking creation", &e)
            },
            BookingApiError::Create(err @ CreateBookingError::HostelNotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            BookingApiError::Create(
                err @ (CreateBookingError::InsufficientRooms { .. } | CreateBookingError::Closed),
            ) => error_helpers::conflict(err.to_string()),
            BookingApiError::Create(err) => error_helpers::validation_error(err.to_string()),

            BookingApiError::Status(UpdateBookingStatusError::Database(e)) => {
                error_helpers::database_error("booking status update", &e)
            },
            BookingApiError::Status(err @ UpdateBookingStatusError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            BookingApiError::Status(
                err @ (UpdateBookingStatusError::Forbidden
                | UpdateBookingStatusError::GuestMayOnlyCancel),
            ) => error_helpers::forbidden(err.to_string()),
            BookingApiError::Status(
                err @ (UpdateBookingStatusError::InvalidTransition { .. }
                | UpdateBookingStatusError::InsufficientRooms { .. }),
            ) => error_helpers::conflict(err.to_string()),
            BookingApiError::Status(UpdateBookingStatusError::CorruptStatus(status)) => {
                tracing::error!(status = %status, "Booking has an unknown stored status");
                AppError::Internal("Booking is in an invalid state".to_string()).into_response()
            },

            BookingApiError::Mine(ListMyBookingsError::Database(e)) => {
                error_helpers::database_error("booking listing", &e)
            },
            BookingApiError::Mine(err) => error_helpers::validation_error(err.to_string()),

            BookingApiError::Landlord(ListLandlordBookingsError::Database(e)) => {
                error_helpers::database_error("landlord booking listing", &e)
            },
            BookingApiError::Landlord(err @ ListLandlordBookingsError::LandlordNotFound) => {
                error_helpers::not_found(err.to_string())
            },
            BookingApiError::Landlord(err) => error_helpers::validation_error(err.to_string()),

            BookingApiError::Get(GetBookingError::Database(e)) => {
                error_helpers::database_error("booking lookup", &e)
            },
            BookingApiError::Get(err @ GetBookingError::NotFound(_)) => {
                error_helpers::not_found(err.to_string())
            },
            BookingApiError::Get(err @ GetBookingError::Forbidden) => {
                error_helpers::forbidden(err.to_string())
            },
        }
    }
}
