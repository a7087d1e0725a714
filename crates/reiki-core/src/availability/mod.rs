//! Client-side availability: the day's slot grid and occupancy against busy intervals.
//!
//! ```text
//!   ScheduleConfig ──► DayWindow ──► slots()  08:00 08:30 ... 19:30
//!                                        │
//!   get_busy_slots ──► [BusySlot] ───────┤ is_occupied(t, busy, buffer)
//!                                        ▼
//!                                    DayAgenda (Free / Occupied / Booked)
//! ```
//!
//! Busy intervals are half-open: a slot starting exactly at `end_at` is free.
//! The authoritative double-booking check is the booking remote procedure;
//! this module only decides what the grid shows.

mod agenda;
mod buffer;


pub use agenda::{DayAgenda, SlotState, SlotView, Viewer};
pub use buffer::BufferPolicy;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use reiki_types::models::ScheduleConfig;
use reiki_types::BusySlot;

/// Offset used to lay out a given date.
///
/// A configured offset wins; otherwise the host's local offset at noon of that date.
pub fn schedule_offset(schedule: &ScheduleConfig, date: NaiveDate) -> FixedOffset {
    if let Some(offset) = schedule.utc_offset_minutes.and_then(|m| FixedOffset::east_opt(m * 60)) {
        return offset;
    }
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&noon)
        .earliest()
        .map_or_else(|| Local::now().fixed_offset().timezone(), |dt| dt.fixed_offset().timezone())
}

/// Calendar date of `t` in the schedule's offset.
pub fn local_date(schedule: &ScheduleConfig, t: DateTime<Utc>) -> NaiveDate {
    let offset = schedule_offset(schedule, t.date_naive());
    t.with_timezone(&offset).date_naive()
}

/// Working window of one day, `[day_start_hour, day_end_hour)` in a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    date: NaiveDate,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    slot: Duration,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate, schedule: &ScheduleConfig, offset: FixedOffset) -> Self {
        let midnight = local_midnight(date, offset);
        Self {
            date,
            start: midnight + Duration::hours(i64::from(schedule.day_start_hour)),
            end: midnight + Duration::hours(i64::from(schedule.day_end_hour)),
            slot: Duration::minutes(i64::from(schedule.slot_minutes)),
        }
    }

    /// Window for `date` using [`schedule_offset`].
    pub fn resolve(date: NaiveDate, schedule: &ScheduleConfig) -> Self {
        Self::for_date(date, schedule, schedule_offset(schedule, date))
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub const fn slot_length(&self) -> Duration {
        self.slot
    }

    pub fn offset(&self) -> FixedOffset {
        self.start.timezone()
    }

    /// Slot starts from the window start while strictly before the end.
    pub fn slots(&self) -> Vec<DateTime<FixedOffset>> {
        let mut slots = Vec::new();
        if self.slot <= Duration::zero() {
            return slots;
        }
        let mut cur = self.start;
        while cur < self.end {
            slots.push(cur);
            cur += self.slot;
        }
        slots
    }

    /// True when `t` is exactly one of the window's slot starts.
    pub fn has_slot(&self, t: DateTime<Utc>) -> bool {
        self.slots().iter().any(|s| *s == t)
    }

    /// Window bounds in UTC, for range queries.
    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start.with_timezone(&Utc), self.end.with_timezone(&Utc))
    }
}

/// True when the busy interval itself covers `t` (start inclusive, end exclusive).
pub fn covers(busy: &BusySlot, t: DateTime<Utc>) -> bool {
    t == busy.start_at || (t > busy.start_at && t < busy.end_at)
}

/// Whether the slot starting at `t` is taken.
///
/// Every row the busy procedures return counts, whatever its status; the
/// server decides which rows are busy. With a buffer policy, starts within
/// the padding around any busy start are taken too.
pub fn is_occupied(t: DateTime<Utc>, busy: &[BusySlot], policy: Option<BufferPolicy>) -> bool {
    busy.iter().any(|b| covers(b, t) || policy.is_some_and(|p| p.blocks(b.start_at, t)))
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let naive_local = date.and_time(NaiveTime::MIN);
    let naive_utc = naive_local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(naive_utc, offset)
}
