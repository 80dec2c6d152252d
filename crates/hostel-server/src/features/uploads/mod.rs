//! Uploads feature
//!
//! Hostel images go to S3-compatible object storage; the public URL is
//! returned for use in a hostel's `images` list.

pub mod commands;
pub mod routes;

pub use commands::{UploadImageCommand, UploadImageResponse};
pub use routes::uploads_routes;
