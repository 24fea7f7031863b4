//! Fixed-duration slot generation for an operating window.

use chrono::{NaiveTime, Timelike};

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_core::types::SlotIndex;
use bookhub_entity::{Resource, TimeSlot};

/// Produces the time slots tiling a resource's operating window.
///
/// Pure and deterministic for a given window. Indices start at 1 and the
/// last slot ends exactly at close; an interval that would overrun the
/// close time is never emitted.
#[derive(Debug, Clone, Copy)]
pub struct SlotGenerator {
    /// Slot length in minutes.
    duration_minutes: u32,
}

impl SlotGenerator {
    /// Create a generator for the given slot length.
    pub fn new(duration_minutes: u32) -> BookingResult<Self> {
        if duration_minutes == 0 || duration_minutes > 24 * 60 {
            return Err(BookingError::Validation(format!(
                "slot duration must be between 1 minute and a day, got {duration_minutes}"
            )));
        }
        Ok(Self { duration_minutes })
    }

    /// Slot length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// The ordered slot shells for an operating window.
    ///
    /// Arithmetic runs on minutes-from-midnight rather than `NaiveTime`
    /// addition, which wraps at midnight.
    pub fn generate(&self, open: NaiveTime, close: NaiveTime) -> Vec<TimeSlot> {
        let open_min = open.num_seconds_from_midnight() / 60;
        let close_min = close.num_seconds_from_midnight() / 60;

        let mut slots = Vec::new();
        let mut start = open_min;
        let mut index: SlotIndex = 1;
        while start + self.duration_minutes <= close_min {
            let end = start + self.duration_minutes;
            slots.push(TimeSlot {
                index,
                start: from_minutes(start),
                end: from_minutes(end),
            });
            start = end;
            index += 1;
        }
        slots
    }

    /// The slot shells for a resource's operating window.
    pub fn for_resource(&self, resource: &Resource) -> Vec<TimeSlot> {
        self.generate(resource.open, resource.close)
    }

    /// How many slots the window holds.
    pub fn slot_count(&self, open: NaiveTime, close: NaiveTime) -> SlotIndex {
        self.generate(open, close).len() as SlotIndex
    }
}

fn from_minutes(minutes: u32) -> NaiveTime {
    // minutes is always below 24 * 60 here, derived from a valid NaiveTime.
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0)
        .unwrap_or(NaiveTime::MIN)
}
