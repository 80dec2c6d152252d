//! Landlord profiles
//!
//! One profile per identity-provider user; hostels hang off the profile.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{RegisterLandlordCommand, RegisterLandlordError};
pub use queries::{GetMyLandlordError, GetMyLandlordQuery};
pub use routes::landlords_routes;
