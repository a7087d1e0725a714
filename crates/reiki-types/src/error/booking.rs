//! Client-side booking validation errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a booking is refused before reaching the backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum BookingError {
    /// Public bookings must leave a phone number
    #[error("El teléfono es obligatorio.")]
    PhoneRequired,

    /// The slot is already covered by a busy interval
    #[error("Slot {start} is already occupied")]
    SlotOccupied {
        /// Requested slot start
        start: DateTime<Utc>,
    },

    /// The requested start is not one of the day's slots
    #[error("Slot {start} is outside the working day")]
    OutsideSchedule {
        /// Requested slot start
        start: DateTime<Utc>,
    },

    /// No therapist has been chosen yet
    #[error("No therapist selected")]
    NoTherapistSelected,
}
