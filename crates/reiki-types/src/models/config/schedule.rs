//! Working-day window and slot grid settings.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Hours shown in the agenda and the slot length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_window"))]
pub struct ScheduleConfig {
    /// First slot of the day (local hour)
    #[validate(range(max = 23_u32))]
    #[serde(default = "default_day_start")]
    pub day_start_hour: u32,
    /// Exclusive end of the day (local hour)
    #[validate(range(min = 1_u32, max = 24_u32))]
    #[serde(default = "default_day_end")]
    pub day_end_hour: u32,
    /// Slot length in minutes
    #[validate(range(min = 5_u32, max = 240_u32))]
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// Padding blocked on each side of a booked start; `None` disables the policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_minutes: Option<u32>,
    /// Fixed UTC offset of the practice; `None` uses the host's local offset
    #[validate(range(min = -840_i32, max = 840_i32))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start(),
            day_end_hour: default_day_end(),
            slot_minutes: default_slot_minutes(),
            buffer_minutes: None,
            utc_offset_minutes: None,
        }
    }
}

fn validate_window(schedule: &ScheduleConfig) -> Result<(), ValidationError> {
    if schedule.day_start_hour >= schedule.day_end_hour {
        return Err(ValidationError::new("day_start_hour must be before day_end_hour"));
    }
    Ok(())
}

const fn default_day_start() -> u32 {
    8
}

const fn default_day_end() -> u32 {
    20
}

const fn default_slot_minutes() -> u32 {
    30
}
