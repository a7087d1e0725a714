//! Busy intervals returned by the availability remote procedures.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An interval during which a therapist cannot take a booking.
///
/// `get_busy_slots` rows carry no therapist id; `get_all_busy_slots` rows do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusySlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapist_id: Option<Uuid>,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub status: String,
}

impl BusySlot {
    /// Interval with `scheduled` status.
    pub fn scheduled(start_at: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            therapist_id: None,
            start_at,
            end_at: start_at + Duration::minutes(minutes),
            status: "scheduled".to_string(),
        }
    }

    /// Shown differently in the overview; still occupies its slot.
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("cancelled")
    }
}
