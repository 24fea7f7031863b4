//! Month-grid calendar generation.

use chrono::{Datelike, NaiveDate};

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_entity::{CalendarCell, CalendarDay};

/// Produces the set of selectable dates for a booking month.
///
/// Pure and deterministic given `today`; owns no state beyond the
/// configured horizon.
#[derive(Debug, Clone, Copy)]
pub struct CalendarGenerator {
    /// How many calendar months ahead of today may be booked
    /// (1 = current month only).
    horizon_months: u32,
}

impl CalendarGenerator {
    /// Create a generator with the given booking horizon.
    pub fn new(horizon_months: u32) -> BookingResult<Self> {
        if horizon_months == 0 {
            return Err(BookingError::Validation(
                "booking horizon must cover at least the current month".to_string(),
            ));
        }
        Ok(Self { horizon_months })
    }

    /// The 7-column month grid for `(year, month)`.
    ///
    /// Leading cells pad the first week so day 1 falls under its weekday in
    /// a Sunday-start layout. Days before `today` (midnight-truncated) and
    /// days outside the horizon are marked unbookable.
    pub fn month_grid(
        &self,
        today: NaiveDate,
        year: i32,
        month: u32,
    ) -> BookingResult<Vec<CalendarCell>> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            BookingError::Validation(format!("invalid calendar month {year}-{month}"))
        })?;

        let within_horizon = self.month_within_horizon(today, year, month);
        let leading = first.weekday().num_days_from_sunday() as usize;

        let mut cells = Vec::with_capacity(leading + 31);
        cells.extend(std::iter::repeat_n(CalendarCell::Leading, leading));

        let mut date = first;
        while date.month() == month {
            cells.push(CalendarCell::Day(CalendarDay::new(
                date,
                today,
                within_horizon,
            )));
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(cells)
    }

    /// Whether one concrete date may currently be booked.
    pub fn is_bookable(&self, today: NaiveDate, date: NaiveDate) -> bool {
        date >= today && self.month_within_horizon(today, date.year(), date.month())
    }

    /// Whether `(year, month)` falls inside the booking horizon.
    fn month_within_horizon(&self, today: NaiveDate, year: i32, month: u32) -> bool {
        let target = i64::from(year) * 12 + i64::from(month) - 1;
        let current = i64::from(today.year()) * 12 + i64::from(today.month()) - 1;
        (0..i64::from(self.horizon_months)).contains(&(target - current))
    }
}
