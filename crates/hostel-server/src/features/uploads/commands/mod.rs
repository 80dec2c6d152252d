pub mod upload_image;

pub use upload_image::{UploadImageCommand, UploadImageError, UploadImageResponse};
