//! The availability store trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use bookhub_core::result::BookingResult;
use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
use bookhub_entity::Booking;

/// Authoritative source of which (resource, date, slot) triples are booked.
///
/// Implementations must guarantee atomicity: a commit either reserves every
/// requested slot or none of them, and no partial state is ever observable.
/// Commits and cancels targeting the same (resource, date) are serialized;
/// different days never contend.
#[async_trait]
pub trait AvailabilityStore: Send + Sync + 'static {
    /// Current availability of slots `1..=slot_count` on a day.
    ///
    /// The returned mapping reflects one consistent snapshot: it never mixes
    /// the halves of two different commits.
    async fn query_availability(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot_count: SlotIndex,
    ) -> BookingResult<BTreeMap<SlotIndex, bool>>;

    /// Atomically reserve every slot in `indices` and create one booking.
    ///
    /// Fails with [`BookingError::Conflict`] naming exactly the slots that
    /// were already taken; in that case nothing is committed.
    ///
    /// [`BookingError::Conflict`]: bookhub_core::BookingError::Conflict
    async fn try_commit(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        indices: &[SlotIndex],
        total: Money,
    ) -> BookingResult<Booking>;

    /// Release every slot owned by a booking.
    async fn cancel(&self, booking_id: BookingId) -> BookingResult<()>;

    /// Look up a booking by id.
    async fn get_booking(&self, booking_id: BookingId) -> BookingResult<Booking>;

    /// All bookings for a resource on a date, oldest first.
    async fn list_bookings(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> BookingResult<bool>;
}
