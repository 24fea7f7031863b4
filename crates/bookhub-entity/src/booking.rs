//! Confirmed booking model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};

/// An immutable record of a confirmed reservation.
///
/// Created only by a successful `try_commit`; its slots stay reserved until
/// the booking is cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier, generated at confirmation time.
    pub id: BookingId,
    /// The booked resource.
    pub resource_id: ResourceId,
    /// The booked date.
    pub date: NaiveDate,
    /// Booked slot indices, sorted ascending.
    pub slot_indices: Vec<SlotIndex>,
    /// Total charge, priced at confirmation time.
    pub total: Money,
    /// When the booking was confirmed.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Number of booked slots.
    pub fn slot_count(&self) -> usize {
        self.slot_indices.len()
    }

    /// Booked duration in whole minutes, given the venue slot length.
    pub fn duration_minutes(&self, slot_duration_minutes: u32) -> u32 {
        self.slot_indices.len() as u32 * slot_duration_minutes
    }

    /// First and last booked slot index.
    ///
    /// `None` only for a booking with no slots, which `try_commit` never
    /// produces.
    pub fn slot_span(&self) -> Option<(SlotIndex, SlotIndex)> {
        Some((
            *self.slot_indices.first()?,
            *self.slot_indices.last()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(indices: Vec<SlotIndex>) -> Booking {
        Booking {
            id: BookingId::new(),
            resource_id: ResourceId::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            slot_indices: indices,
            total: Money::from_major(100),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn duration_follows_slot_count() {
        assert_eq!(booking(vec![1, 2]).duration_minutes(30), 60);
        assert_eq!(booking(vec![5]).duration_minutes(30), 30);
    }

    #[test]
    fn slot_span_covers_first_and_last() {
        assert_eq!(booking(vec![3, 4, 9]).slot_span(), Some((3, 9)));
        assert_eq!(booking(vec![]).slot_span(), None);
    }
}
