//! Six-week month grid used by the public booking page.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

/// Weekday headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Number of cells in the grid (6 weeks).
pub const GRID_DAYS: usize = 42;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    first: NaiveDate,
}

impl MonthGrid {
    /// Grid for the month containing `day`.
    pub fn containing(day: NaiveDate) -> Self {
        Self { first: day.with_day(1).unwrap_or(day) }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(month: &str) -> Option<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
            .ok()
            .map(Self::containing)
    }

    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Sunday on or before the first of the month.
    pub fn grid_start(&self) -> NaiveDate {
        let back = i64::from(self.first.weekday().num_days_from_sunday());
        self.first - Duration::days(back)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        let start = self.grid_start();
        (0..GRID_DAYS as i64).map(|i| start + Duration::days(i)).collect()
    }

    pub fn cells(&self, selected: NaiveDate, today: NaiveDate) -> Vec<DayCell> {
        self.days()
            .into_iter()
            .map(|date| DayCell {
                date,
                in_month: date.month() == self.first.month() && date.year() == self.first.year(),
                is_today: date == today,
                is_selected: date == selected,
            })
            .collect()
    }

    pub fn next(&self) -> Self {
        Self { first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first) }
    }

    pub fn previous(&self) -> Self {
        Self { first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first) }
    }

    /// e.g. `mayo 2024`.
    pub fn label(&self) -> String {
        let name = MONTH_NAMES.get(self.first.month0() as usize).copied().unwrap_or_default();
        format!("{} {}", name, self.first.year())
    }
}
