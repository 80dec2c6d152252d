//! Bookings feature
//!
//! Guests book hostels; landlords move bookings through their lifecycle.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateBookingCommand, UpdateBookingStatusCommand};
pub use queries::{GetBookingQuery, ListLandlordBookingsQuery, ListMyBookingsQuery};
pub use routes::bookings_routes;
