//! Time slot models.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use bookhub_core::types::{ResourceId, SlotIndex};

/// A fixed-duration interval within a resource's operating window.
///
/// Slots carry no availability by themselves; see [`SlotAvailability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 1-based sequential index, unique within a day for a resource.
    pub index: SlotIndex,
    /// Start clock time (inclusive).
    pub start: NaiveTime,
    /// End clock time (exclusive).
    pub end: NaiveTime,
}

impl TimeSlot {
    /// 12-hour clock label for the slot start, e.g. `"9:00 AM"` or
    /// `"12:30 PM"`.
    pub fn label_12h(&self) -> String {
        format_12h(self.start)
    }

    /// Label for the full interval, e.g. `"9:00 AM - 9:30 AM"`.
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_12h(self.start), format_12h(self.end))
    }
}

/// Identity of a concrete slot: the (resource, date, index) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    /// The resource the slot belongs to.
    pub resource_id: ResourceId,
    /// The calendar date.
    pub date: NaiveDate,
    /// The 1-based slot index within the day.
    pub index: SlotIndex,
}

/// A slot shell combined with its current availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    /// The slot interval.
    pub slot: TimeSlot,
    /// Whether the slot is currently free.
    pub available: bool,
}

/// Format a clock time on the 12-hour clock without leading zero.
fn format_12h(time: NaiveTime) -> String {
    let (is_pm, hour12) = time.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    format!("{}:{:02} {}", hour12, time.minute(), meridiem)
}
