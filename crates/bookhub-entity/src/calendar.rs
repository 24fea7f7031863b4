//! Calendar day and month-grid cell models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One selectable day in the booking calendar.
///
/// Generated on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The concrete date.
    pub date: NaiveDate,
    /// Day-of-month, 1-based.
    pub day_of_month: u32,
    /// Whether this day may be booked (not in the past, within horizon).
    pub is_bookable: bool,
}

impl CalendarDay {
    /// Build a day cell, deriving bookability from `today`.
    pub fn new(date: NaiveDate, today: NaiveDate, within_horizon: bool) -> Self {
        Self {
            date,
            day_of_month: date.day(),
            is_bookable: within_horizon && date >= today,
        }
    }
}

/// One cell of the 7-column month grid.
///
/// The grid starts on Sunday; `Leading` cells pad the first week so day 1
/// lands under its actual weekday column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarCell {
    /// A padding cell before the first day of the month.
    Leading,
    /// An actual day of the month.
    Day(CalendarDay),
}

impl CalendarCell {
    /// The day in this cell, if it is not padding.
    pub fn day(&self) -> Option<&CalendarDay> {
        match self {
            Self::Leading => None,
            Self::Day(day) => Some(day),
        }
    }
}
