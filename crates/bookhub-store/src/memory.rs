//! In-memory availability store for single-node deployments.
//!
//! One `tokio::sync::Mutex` guards each (resource, date) day, so commits on
//! the same day are serialized while different days proceed independently.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
use bookhub_entity::Booking;

use crate::store::AvailabilityStore;

/// Key of one bookable day for one resource.
type DayKey = (ResourceId, NaiveDate);

/// Mutable per-day state: which slot belongs to which booking.
#[derive(Debug, Default)]
struct DayState {
    /// Taken slots, keyed by index.
    taken: BTreeMap<SlotIndex, BookingId>,
}

/// In-memory availability store.
///
/// Suitable for single-node deployments and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAvailabilityStore {
    /// Per-day state; the inner mutex serializes commits within a day.
    days: Arc<DashMap<DayKey, Arc<Mutex<DayState>>>>,
    /// All committed bookings by id.
    bookings: Arc<DashMap<BookingId, Booking>>,
}

impl MemoryAvailabilityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The day entry for a key, created on first touch.
    ///
    /// The dashmap guard is dropped before the caller awaits the inner
    /// mutex, so shard locks are never held across await points.
    fn day(&self, key: DayKey) -> Arc<Mutex<DayState>> {
        self.days.entry(key).or_default().clone()
    }
}

#[async_trait]
impl AvailabilityStore for MemoryAvailabilityStore {
    async fn query_availability(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        slot_count: SlotIndex,
    ) -> BookingResult<BTreeMap<SlotIndex, bool>> {
        let day = self.day((resource_id, date));
        let state = day.lock().await;
        Ok((1..=slot_count)
            .map(|index| (index, !state.taken.contains_key(&index)))
            .collect())
    }

    async fn try_commit(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
        indices: &[SlotIndex],
        total: Money,
    ) -> BookingResult<Booking> {
        if indices.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let day = self.day((resource_id, date));
        let mut state = day.lock().await;

        let conflicts: Vec<SlotIndex> = indices
            .iter()
            .copied()
            .filter(|index| state.taken.contains_key(index))
            .collect();
        if !conflicts.is_empty() {
            warn!(
                resource_id = %resource_id,
                date = %date,
                conflicts = ?conflicts,
                "Commit rejected, slots already taken"
            );
            return Err(BookingError::Conflict { slots: conflicts });
        }

        let mut slot_indices: Vec<SlotIndex> = indices.to_vec();
        slot_indices.sort_unstable();
        slot_indices.dedup();

        let booking = Booking {
            id: BookingId::new(),
            resource_id,
            date,
            slot_indices,
            total,
            created_at: Utc::now(),
        };
        for index in &booking.slot_indices {
            state.taken.insert(*index, booking.id);
        }
        self.bookings.insert(booking.id, booking.clone());

        info!(
            booking_id = %booking.id,
            resource_id = %resource_id,
            date = %date,
            slots = booking.slot_count(),
            total = %booking.total,
            "Booking committed"
        );
        Ok(booking)
    }

    async fn cancel(&self, booking_id: BookingId) -> BookingResult<()> {
        // Resolve the day first so the removal happens under the same lock
        // that serializes commits for that day.
        let key = match self.bookings.get(&booking_id) {
            Some(booking) => (booking.resource_id, booking.date),
            None => return Err(BookingError::NotFound { booking_id }),
        };

        let day = self.day(key);
        let mut state = day.lock().await;

        // Re-check under the lock: a concurrent cancel may have won.
        let Some((_, booking)) = self.bookings.remove(&booking_id) else {
            return Err(BookingError::NotFound { booking_id });
        };
        for index in &booking.slot_indices {
            state.taken.remove(index);
        }
        if state.taken.is_empty() {
            drop(state);
            // Evict only when the map and this handle are the sole owners;
            // another task still holding the Arc must keep mutating the
            // same state the map serves out.
            self.days.remove_if(&key, |_, day| Arc::strong_count(day) == 2);
        }

        info!(
            booking_id = %booking_id,
            resource_id = %booking.resource_id,
            date = %booking.date,
            slots = booking.slot_count(),
            "Booking cancelled, slots released"
        );
        Ok(())
    }

    async fn get_booking(&self, booking_id: BookingId) -> BookingResult<Booking> {
        self.bookings
            .get(&booking_id)
            .map(|entry| entry.clone())
            .ok_or(BookingError::NotFound { booking_id })
    }

    async fn list_bookings(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|entry| entry.resource_id == resource_id && entry.date == date)
            .map(|entry| entry.clone())
            .collect();
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn health_check(&self) -> BookingResult<bool> {
        Ok(true)
    }
}
