//! Common types used across the hostel marketplace

use serde::{Deserialize, Serialize};

use crate::error::HostelError;

pub mod attributes;

pub use attributes::{AvailabilitySettings, HostelFeatures, ATTRIBUTE_SCHEMA_VERSION};

// ============================================================================
// Booking Status
// ============================================================================

/// Lifecycle state of a booking.
///
/// Bookings start as [`BookingStatus::Pending`] and move forward through
/// confirmation to completion, or are cancelled along the way:
///
/// ```text
/// pending ──► confirmed ──► upcoming ──► completed
///    │            │  └──────────────────────▲
///    └────────────┴────────┴──► cancelled
/// ```
///
/// Confirmed and upcoming bookings hold guest slots; confirmed and completed
/// bookings earn revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Upcoming,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Upcoming,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    /// Statuses whose guests occupy capacity until check-out.
    pub const OCCUPYING: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Upcoming];

    /// Statuses whose total price counts as landlord revenue.
    pub const REVENUE: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Upcoming => "upcoming",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn counts_toward_occupancy(self) -> bool {
        Self::OCCUPYING.contains(&self)
    }

    pub fn counts_toward_revenue(self) -> bool {
        Self::REVENUE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether a booking in this status may move to `next`.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Upcoming)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Upcoming, Completed)
                | (Upcoming, Cancelled)
        )
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = HostelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "upcoming" => Ok(BookingStatus::Upcoming),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(HostelError::InvalidBookingStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// User Role
// ============================================================================

/// Role of the caller as asserted by the identity gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Landlord,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Landlord => "landlord",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = HostelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" | "guest" => Ok(UserRole::Student),
            "landlord" => Ok(UserRole::Landlord),
            "admin" => Ok(UserRole::Admin),
            other => Err(HostelError::InvalidRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Room Type
// ============================================================================

/// Human-readable form of a stored room type (`"shared_room"` -> `"Shared Room"`).
pub fn display_room_type(room_type: &str) -> String {
    room_type
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
