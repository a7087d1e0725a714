//! Unified error type for Reiki Agenda services.

use reiki_types::{BackendError, BookingError, ConfigError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all view services and local persistence.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Remote call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Booking refused by client-side validation.
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caller is not allowed to open the requested view.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Form input rejected before any remote call.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// True when the remote call failed for a reason a retry could fix.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(e) if e.is_transient())
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for Reiki Agenda services.
pub type AppResult<T> = Result<T, AppError>;
