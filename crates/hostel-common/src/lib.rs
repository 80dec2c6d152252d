//! Hostel Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Domain types, occupancy rules, logging, and error handling shared by the
//! hostel marketplace crates.
//!
//! # Overview
//!
//! - **Error Handling**: [`HostelError`] and the crate [`Result`] alias
//! - **Types**: booking statuses, room types, user roles, and the typed
//!   attribute bags stored on hostels
//! - **Availability**: the remaining-capacity calculation and the
//!   availability flag correction applied when a hostel is serialized
//! - **Logging**: `tracing` subscriber setup driven by environment variables
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use hostel_common::availability::{available_rooms, BookingSlot};
//! use hostel_common::types::BookingStatus;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let bookings = [BookingSlot {
//!     guests: 3,
//!     status: BookingStatus::Confirmed,
//!     check_out: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
//! }];
//!
//! assert_eq!(available_rooms(10, &bookings, today), 7);
//! ```

pub mod availability;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HostelError, Result};
