pub mod me;

pub use me::{GetMyLandlordError, GetMyLandlordQuery};
