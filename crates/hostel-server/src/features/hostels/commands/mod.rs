//! Hostel write operations
//!
//! Field checks shared by create and update live here; each command wraps
//! [`HostelFieldError`] in its own error enum.

pub mod create;
pub mod delete;
pub mod set_flags;
pub mod update;

pub use create::{CreateHostelCommand, CreateHostelError};
pub use delete::{DeleteHostelCommand, DeleteHostelError, DeleteHostelResponse};
pub use set_flags::{SetHostelFlagsCommand, SetHostelFlagsError};
pub use update::{UpdateHostelCommand, UpdateHostelError};

use hostel_common::{
    types::{AvailabilitySettings, HostelFeatures},
    HostelError,
};

use crate::features::shared::validation::{
    is_valid_coordinate, is_valid_currency, validate_name, validate_url, NameValidationError,
    UrlValidationError,
};

pub const MAX_NAME_LENGTH: usize = 150;
pub const MAX_LOCATION_LENGTH: usize = 150;
pub const MAX_ROOM_TYPE_LENGTH: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum HostelFieldError {
    #[error(transparent)]
    Name(NameValidationError),
    #[error(transparent)]
    Location(NameValidationError),
    #[error(transparent)]
    RoomType(NameValidationError),
    #[error("Latitude must be within [-90, 90] and longitude within [-180, 180]")]
    Coordinates,
    #[error("Price must be a non-negative number")]
    Price,
    #[error("Capacity must be non-negative")]
    Capacity,
    #[error("Currency must be a three-letter ISO code, got '{0}'")]
    Currency(String),
    #[error(transparent)]
    Image(#[from] UrlValidationError),
    #[error("Invalid hostel attributes: {0}")]
    Attributes(#[from] HostelError),
}

pub(crate) fn validate_name_field(name: &str) -> Result<(), HostelFieldError> {
    validate_name(name, "Name", MAX_NAME_LENGTH).map_err(HostelFieldError::Name)
}

pub(crate) fn validate_location(location: &str) -> Result<(), HostelFieldError> {
    validate_name(location, "Location", MAX_LOCATION_LENGTH).map_err(HostelFieldError::Location)
}

pub(crate) fn validate_room_type(room_type: &str) -> Result<(), HostelFieldError> {
    validate_name(room_type, "Room type", MAX_ROOM_TYPE_LENGTH).map_err(HostelFieldError::RoomType)
}

pub(crate) fn validate_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), HostelFieldError> {
    if is_valid_coordinate(latitude, longitude) {
        Ok(())
    } else {
        Err(HostelFieldError::Coordinates)
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), HostelFieldError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(HostelFieldError::Price)
    }
}

pub(crate) fn validate_capacity(capacity: i32) -> Result<(), HostelFieldError> {
    if capacity >= 0 {
        Ok(())
    } else {
        Err(HostelFieldError::Capacity)
    }
}

pub(crate) fn validate_currency(currency: &str) -> Result<(), HostelFieldError> {
    if is_valid_currency(currency) {
        Ok(())
    } else {
        Err(HostelFieldError::Currency(currency.to_string()))
    }
}

pub(crate) fn validate_images(images: &[String]) -> Result<(), HostelFieldError> {
    for image in images {
        validate_url(image, "Image")?;
    }
    Ok(())
}

pub(crate) fn validate_attributes(
    features: &HostelFeatures,
    availability: &AvailabilitySettings,
) -> Result<(), HostelFieldError> {
    features.validate()?;
    availability.validate()?;
    Ok(())
}

/// Stored form of a room type: trimmed, lowercase, words joined by `_`.
pub(crate) fn normalize_room_type(room_type: &str) -> String {
    room_type
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
