//! Create booking command
//!
//! The hostel row is locked for the duration of the transaction so two
//! concurrent requests cannot both take the last rooms.

use chrono::{NaiveDate, Utc};
use hostel_common::{availability::AvailabilityView, types::BookingStatus};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    models::{Booking, HostelRow, HOSTEL_COLUMNS},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingCommand {
    #[serde(skip)]
    pub guest_id: Uuid,
    pub hostel_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i32,
}

fn default_guests() -> i32 {
    1
}

#[derive(Debug, thiserror::Error)]
pub enum CreateBookingError {
    #[error("At least one guest is required")]
    Guests,
    #[error("check_out must be after check_in")]
    Dates,
    #[error("Hostel '{0}' not found")]
    HostelNotFound(Uuid),
    #[error("Hostel is not accepting bookings")]
    Closed,
    #[error("Only {available} rooms available, requested {requested}")]
    InsufficientRooms { available: i32, requested: i32 },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Booking, CreateBookingError>> for CreateBookingCommand {}

impl crate::cqrs::middleware::Command for CreateBookingCommand {}

impl CreateBookingCommand {
    pub fn validate(&self) -> Result<(), CreateBookingError> {
        if self.guests < 1 {
            return Err(CreateBookingError::Guests);
        }
        if self.check_out <= self.check_in {
            return Err(CreateBookingError::Dates);
        }
        Ok(())
    }
}

/// Reject a request for more guests than the hostel can take right now.
pub(crate) fn check_capacity(
    view: &AvailabilityView,
    requested: i32,
) -> Result<(), CreateBookingError> {
    if requested > view.available_rooms {
        return Err(CreateBookingError::InsufficientRooms {
            available: view.available_rooms,
            requested,
        });
    }
    if !view.is_bookable() {
        return Err(CreateBookingError::Closed);
    }
    Ok(())
}

#[tracing::instrument(skip(pool), fields(guest_id = %command.guest_id, hostel_id = %command.hostel_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateBookingCommand,
) -> Result<Booking, CreateBookingError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {HOSTEL_COLUMNS} FROM hostels h WHERE h.id = $1 FOR UPDATE");
    let hostel = sqlx::query_as::<_, HostelRow>(&sql)
        .bind(command.hostel_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CreateBookingError::HostelNotFound(command.hostel_id))?;

    let today = Utc::now().date_naive();
    let slots = db::active_slots(&mut *tx, &[hostel.id], today).await?;
    let bookings = slots.get(&hostel.id).map(Vec::as_slice).unwrap_or(&[]);
    let view = AvailabilityView::compute(hostel.capacity, &hostel.availability.0, bookings, today);
    check_capacity(&view, command.guests)?;

    let total_price = hostel.price * f64::from(command.guests);

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (hostel_id, guest_id, guests, status, check_in, check_out, total_price)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, hostel_id, guest_id, guests, status, check_in, check_out, total_price,
                  created_at, updated_at
        "#,
    )
    .bind(hostel.id)
    .bind(command.guest_id)
    .bind(command.guests)
    .bind(BookingStatus::Pending.as_str())
    .bind(command.check_in)
    .bind(command.check_out)
    .bind(total_price)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(booking_id = %booking.id, total_price, "Booking created");

    Ok(booking)
}
