//! Remaining-capacity calculation for hostels.
//!
//! A booking occupies capacity while its status is confirmed or upcoming and
//! its check-out date has not passed. Everything here is pure so callers
//! decide where bookings come from and what "today" is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{AvailabilitySettings, BookingStatus};

/// The parts of a booking that matter for occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSlot {
    pub guests: i32,
    pub status: BookingStatus,
    pub check_out: NaiveDate,
}

impl BookingSlot {
    /// Whether this booking holds guest slots on `today`.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.status.counts_toward_occupancy() && self.check_out >= today
    }
}

/// Sum of guests across bookings active on `today`.
pub fn occupied_guests(bookings: &[BookingSlot], today: NaiveDate) -> i64 {
    bookings
        .iter()
        .filter(|b| b.is_active_on(today))
        .map(|b| i64::from(b.guests.max(0)))
        .sum()
}

/// `max(0, capacity - occupied)`. Negative capacity is treated as zero.
pub fn remaining_capacity(capacity: i32, occupied: i64) -> i32 {
    let capacity = i64::from(capacity.max(0));
    let remaining = (capacity - occupied.max(0)).max(0);
    // remaining <= capacity <= i32::MAX
    i32::try_from(remaining).unwrap_or(0)
}

/// Rooms still bookable for a hostel with `capacity` and the given bookings.
pub fn available_rooms(capacity: i32, bookings: &[BookingSlot], today: NaiveDate) -> i32 {
    remaining_capacity(capacity, occupied_guests(bookings, today))
}

/// Computed availability for one hostel, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityView {
    pub available_rooms: i32,
    pub availability: AvailabilitySettings,
}

impl AvailabilityView {
    pub fn new(settings: &AvailabilitySettings, available_rooms: i32) -> Self {
        Self {
            available_rooms,
            availability: settings.presented(available_rooms),
        }
    }

    pub fn compute(
        capacity: i32,
        settings: &AvailabilitySettings,
        bookings: &[BookingSlot],
        today: NaiveDate,
    ) -> Self {
        Self::new(settings, available_rooms(capacity, bookings, today))
    }

    pub fn is_bookable(&self) -> bool {
        self.availability.available.unwrap_or(false)
    }
}
