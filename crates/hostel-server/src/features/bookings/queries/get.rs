//! Single booking, visible to its guest and the hostel's landlord

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{BookingWithHostel, BOOKING_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBookingQuery {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBookingError {
    #[error("Booking '{0}' not found")]
    NotFound(Uuid),
    #[error("Not allowed to view this booking")]
    Forbidden,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<BookingWithHostel, GetBookingError>> for GetBookingQuery {}

impl crate::cqrs::middleware::Query for GetBookingQuery {}

#[derive(Debug, sqlx::FromRow)]
struct BookingAccess {
    #[sqlx(flatten)]
    booking: BookingWithHostel,
    owner_id: Uuid,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetBookingQuery) -> Result<BookingWithHostel, GetBookingError> {
    let sql = format!(
        "SELECT {BOOKING_COLUMNS}, h.name AS hostel_name, l.user_id AS owner_id \
         FROM bookings b JOIN hostels h ON h.id = b.hostel_id \
         JOIN landlords l ON l.id = h.landlord_id WHERE b.id = $1"
    );
    let access = sqlx::query_as::<_, BookingAccess>(&sql)
        .bind(query.booking_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetBookingError::NotFound(query.booking_id))?;

    let visible = query.is_admin
        || access.owner_id == query.user_id
        || access.booking.booking.guest_id == query.user_id;
    if !visible {
        return Err(GetBookingError::Forbidden);
    }

    Ok(access.booking)
}
