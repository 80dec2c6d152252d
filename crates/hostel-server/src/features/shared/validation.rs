//! Shared validation utilities
//!
//! Commands call these from their `validate()` and map the error into their
//! own variants.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("{field_name} URL is invalid: must start with http:// or https://")]
    InvalidFormat { field_name: String },
}

/// Non-blank after trimming and at most `max_length` characters.
pub fn validate_name(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), NameValidationError> {
    if value.trim().is_empty() {
        return Err(NameValidationError::Required { field });
    }

    if value.chars().count() > max_length {
        return Err(NameValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate a URL field
///
/// Empty strings are accepted; callers use `Option<String>` for absence.
pub fn validate_url(url: &str, field_name: &str) -> Result<(), UrlValidationError> {
    if url.is_empty() || is_valid_url(url) {
        return Ok(());
    }

    Err(UrlValidationError::InvalidFormat {
        field_name: field_name.to_string(),
    })
}

fn is_valid_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
}

/// Loose shape check: one `@` with text on both sides and a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        },
        _ => false,
    }
}

/// ISO 4217 shape: three ASCII uppercase letters.
pub fn is_valid_currency(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// Latitude in [-90, 90] and longitude in [-180, 180].
pub fn is_valid_coordinate(latitude: Option<f64>, longitude: Option<f64>) -> bool {
    latitude.map_or(true, |lat| (-90.0..=90.0).contains(&lat))
        && longitude.map_or(true, |lng| (-180.0..=180.0).contains(&lng))
}
