pub mod register;

pub use register::{RegisterLandlordCommand, RegisterLandlordError};
