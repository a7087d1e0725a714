use chrono::{DateTime, Duration, Utc};
use reiki_types::models::ScheduleConfig;

/// Fixed padding blocked on both sides of a busy interval's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPolicy {
    minutes: u32,
}

impl BufferPolicy {
    /// Padding used by the buffered agenda variant.
    pub const DEFAULT_MINUTES: u32 = 90;

    pub const fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Policy from config; `None` (or zero minutes) disables buffering.
    pub fn from_schedule(schedule: &ScheduleConfig) -> Option<Self> {
        schedule.buffer_minutes.filter(|m| *m > 0).map(Self::new)
    }

    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn padding(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }

    /// `start - padding < t < start + padding`.
    pub fn blocks(&self, busy_start: DateTime<Utc>, t: DateTime<Utc>) -> bool {
        let pad = self.padding();
        t > busy_start - pad && t < busy_start + pad
    }
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MINUTES)
    }
}
