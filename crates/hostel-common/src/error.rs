//! Error types shared across the hostel crates

use thiserror::Error;

/// Result type alias for shared operations
pub type Result<T> = std::result::Result<T, HostelError>;

/// Main error type for shared domain parsing and conversion
#[derive(Error, Debug)]
pub enum HostelError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid booking status: {0}")]
    InvalidBookingStatus(String),

    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    #[error("Unsupported attribute schema version {found} (latest is {latest})")]
    UnsupportedSchemaVersion { found: u32, latest: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}
