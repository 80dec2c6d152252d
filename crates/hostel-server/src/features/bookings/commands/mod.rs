pub mod create;
pub mod update_status;

pub use create::{CreateBookingCommand, CreateBookingError};
pub use update_status::{UpdateBookingStatusCommand, UpdateBookingStatusError};
