//! Booking status transition command
//!
//! The guest who made the booking may only cancel it. The landlord owning
//! the hostel (or an admin) may perform any legal transition.
//!
//! Moving a booking into an occupying status locks the hostel row and
//! re-checks remaining rooms, the same way booking creation does.

use chrono::Utc;
use hostel_common::{availability::available_rooms, types::BookingStatus};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    models::{Booking, BOOKING_COLUMNS},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusCommand {
    #[serde(skip)]
    pub booking_id: Uuid,
    #[serde(skip)]
    pub user_id: Uuid,
    #[serde(skip)]
    pub is_admin: bool,
    pub status: BookingStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateBookingStatusError {
    #[error("Booking '{0}' not found")]
    NotFound(Uuid),
    #[error("Not allowed to change this booking")]
    Forbidden,
    #[error("Guests may only cancel their bookings")]
    GuestMayOnlyCancel,
    #[error("Cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Only {available} rooms available, booking needs {requested}")]
    InsufficientRooms { available: i32, requested: i32 },
    #[error("Stored booking status is invalid: {0}")]
    CorruptStatus(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Booking, UpdateBookingStatusError>> for UpdateBookingStatusCommand {}

impl crate::cqrs::middleware::Command for UpdateBookingStatusCommand {}

/// Who is asking for the transition, relative to the booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Actor {
    Guest,
    Landlord,
    Stranger,
}

impl Actor {
    fn resolve(user_id: Uuid, is_admin: bool, guest_id: Uuid, owner_id: Uuid) -> Self {
        if is_admin || user_id == owner_id {
            Actor::Landlord
        } else if user_id == guest_id {
            Actor::Guest
        } else {
            Actor::Stranger
        }
    }
}

/// Decide whether `actor` may move a booking from `current` to `next`.
pub(crate) fn authorize_transition(
    actor: Actor,
    current: BookingStatus,
    next: BookingStatus,
) -> Result<(), UpdateBookingStatusError> {
    match actor {
        Actor::Stranger => return Err(UpdateBookingStatusError::Forbidden),
        Actor::Guest if next != BookingStatus::Cancelled => {
            return Err(UpdateBookingStatusError::GuestMayOnlyCancel)
        },
        _ => {},
    }

    if !current.can_transition_to(next) {
        return Err(UpdateBookingStatusError::InvalidTransition {
            from: current,
            to: next,
        });
    }
    Ok(())
}

/// Whether moving from `current` to `next` starts holding rooms.
pub(crate) fn takes_rooms(current: BookingStatus, next: BookingStatus) -> bool {
    next.counts_toward_occupancy() && !current.counts_toward_occupancy()
}

pub(crate) fn check_rooms(available: i32, requested: i32) -> Result<(), UpdateBookingStatusError> {
    if requested > available {
        return Err(UpdateBookingStatusError::InsufficientRooms {
            available,
            requested,
        });
    }
    Ok(())
}

#[derive(Debug, sqlx::FromRow)]
struct BookingAccess {
    #[sqlx(flatten)]
    booking: Booking,
    owner_id: Uuid,
}

#[tracing::instrument(skip(pool), fields(booking_id = %command.booking_id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateBookingStatusCommand,
) -> Result<Booking, UpdateBookingStatusError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "SELECT {BOOKING_COLUMNS}, l.user_id AS owner_id FROM bookings b \
         JOIN hostels h ON h.id = b.hostel_id JOIN landlords l ON l.id = h.landlord_id \
         WHERE b.id = $1 FOR UPDATE OF b"
    );
    let access = sqlx::query_as::<_, BookingAccess>(&sql)
        .bind(command.booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UpdateBookingStatusError::NotFound(command.booking_id))?;

    let current = access
        .booking
        .status()
        .map_err(|_| UpdateBookingStatusError::CorruptStatus(access.booking.status.clone()))?;
    let actor = Actor::resolve(
        command.user_id,
        command.is_admin,
        access.booking.guest_id,
        access.owner_id,
    );
    authorize_transition(actor, current, command.status)?;

    if takes_rooms(current, command.status) {
        let hostel_id = access.booking.hostel_id;
        let capacity = sqlx::query_scalar::<_, i32>(
            "SELECT capacity FROM hostels WHERE id = $1 FOR UPDATE",
        )
        .bind(hostel_id)
        .fetch_one(&mut *tx)
        .await?;

        let today = Utc::now().date_naive();
        let slots = db::active_slots(&mut *tx, &[hostel_id], today).await?;
        let held = slots.get(&hostel_id).map(Vec::as_slice).unwrap_or(&[]);
        check_rooms(available_rooms(capacity, held, today), access.booking.guests)?;
    }

    let sql = format!(
        "UPDATE bookings b SET status = $1, updated_at = NOW() WHERE b.id = $2 \
         RETURNING {BOOKING_COLUMNS}"
    );
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(command.status.as_str())
        .bind(command.booking_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(from = %current, to = %command.status, "Booking status changed");

    Ok(booking)
}
