//! Session-local accumulation of a prospective booking.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_core::types::SlotIndex;
use bookhub_entity::{Resource, Selection};
use bookhub_store::AvailabilityStore;

use crate::calendar::CalendarGenerator;
use crate::slots::SlotGenerator;

/// Per-session manager of the in-progress slot selection.
///
/// Confined to one session; never shared across sessions and so never
/// locked. Selecting a date fixes the (resource, date) context, so the
/// selection can never span two pairs.
pub struct SelectionManager {
    /// Store used for fresh availability checks on toggle.
    store: Arc<dyn AvailabilityStore>,
    /// Generator fixing slot geometry for the active resource.
    slots: SlotGenerator,
    /// Calendar rules for date validation.
    calendar: CalendarGenerator,
    /// The active selection, if a date has been chosen.
    selection: Option<Selection>,
    /// Number of slots on the active resource's day.
    slot_count: SlotIndex,
}

impl SelectionManager {
    /// Create a manager with no active selection.
    pub fn new(
        store: Arc<dyn AvailabilityStore>,
        slots: SlotGenerator,
        calendar: CalendarGenerator,
    ) -> Self {
        Self {
            store,
            slots,
            calendar,
            selection: None,
            slot_count: 0,
        }
    }

    /// Fix the (resource, date) context, discarding any prior selection.
    pub fn select_date(
        &mut self,
        resource: &Resource,
        date: NaiveDate,
        today: NaiveDate,
    ) -> BookingResult<()> {
        if !self.calendar.is_bookable(today, date) {
            return Err(BookingError::InvalidDate { date });
        }

        self.slot_count = self.slots.slot_count(resource.open, resource.close);
        self.selection = Some(Selection::new(resource.id, date));
        debug!(resource_id = %resource.id, date = %date, "Selection context fixed");
        Ok(())
    }

    /// Toggle one slot in the selection.
    ///
    /// Removal always succeeds; adding re-checks availability against the
    /// store first, so a slot another session booked since the slot list
    /// was fetched is caught here rather than at confirmation. Returns
    /// whether the slot is selected after the call.
    pub async fn toggle_slot(&mut self, index: SlotIndex) -> BookingResult<bool> {
        let selection = self.selection.as_mut().ok_or(BookingError::InvalidTransition {
            from: "Idle",
            operation: "toggle slot",
        })?;

        if selection.contains(index) {
            selection.remove(index);
            return Ok(false);
        }

        if index == 0 || index > self.slot_count {
            return Err(BookingError::Validation(format!(
                "slot index {index} outside 1..={}",
                self.slot_count
            )));
        }

        let availability = self
            .store
            .query_availability(selection.resource_id, selection.date, self.slot_count)
            .await?;
        if !availability.get(&index).copied().unwrap_or(false) {
            return Err(BookingError::SlotUnavailable { index });
        }

        selection.insert(index);
        Ok(true)
    }

    /// Empty the selection without side effects elsewhere.
    ///
    /// The (resource, date) context is kept.
    pub fn clear(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            let empty = Selection::new(selection.resource_id, selection.date);
            *selection = empty;
        }
    }

    /// Discard the selection and its context entirely.
    pub fn reset(&mut self) {
        self.selection = None;
        self.slot_count = 0;
    }

    /// The current selection, if a date has been chosen.
    pub fn current(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Drop slots lost to a commit conflict.
    pub(crate) fn drop_lost(&mut self, lost: &[SlotIndex]) {
        if let Some(selection) = self.selection.as_mut() {
            selection.retain_free(lost);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookhub_core::types::Money;
    use bookhub_store::memory::MemoryAvailabilityStore;
    use chrono::NaiveTime;

    fn resource() -> Resource {
        Resource::new(
            "Snooker",
            Money::from_major(100),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn manager(store: Arc<MemoryAvailabilityStore>) -> SelectionManager {
        SelectionManager::new(store, SlotGenerator::new(30).unwrap(), CalendarGenerator::new(1).unwrap())
    }

    fn today() -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    #[tokio::test]
    async fn toggle_twice_restores_prior_state() {
        let mut mgr = manager(Arc::new(MemoryAvailabilityStore::new()));
        mgr.select_date(&resource(), today(), today()).unwrap();

        assert!(mgr.toggle_slot(3).await.unwrap());
        assert!(!mgr.toggle_slot(3).await.unwrap());
        assert!(mgr.current().unwrap().is_empty());
    }

    #[tokio::test]
    async fn past_date_is_rejected() {
        let mut mgr = manager(Arc::new(MemoryAvailabilityStore::new()));
        let yesterday = today().pred_opt().unwrap();
        let err = mgr.select_date(&resource(), yesterday, today()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDate { .. }));
    }

    #[tokio::test]
    async fn taken_slot_cannot_be_added() {
        let store = Arc::new(MemoryAvailabilityStore::new());
        let r = resource();
        store
            .try_commit(r.id, today(), &[5], Money::from_major(50))
            .await
            .unwrap();

        let mut mgr = manager(Arc::clone(&store));
        mgr.select_date(&r, today(), today()).unwrap();
        let err = mgr.toggle_slot(5).await.unwrap_err();
        assert!(matches!(err, BookingError::SlotUnavailable { index: 5 }));
    }

    #[tokio::test]
    async fn out_of_range_index_is_rejected() {
        let mut mgr = manager(Arc::new(MemoryAvailabilityStore::new()));
        mgr.select_date(&resource(), today(), today()).unwrap();
        assert!(mgr.toggle_slot(27).await.is_err());
        assert!(mgr.toggle_slot(0).await.is_err());
    }

    #[tokio::test]
    async fn clear_empties_selection_but_keeps_context() {
        let mut mgr = manager(Arc::new(MemoryAvailabilityStore::new()));
        let r = resource();
        mgr.select_date(&r, today(), today()).unwrap();
        mgr.toggle_slot(1).await.unwrap();
        mgr.toggle_slot(2).await.unwrap();

        mgr.clear();
        let selection = mgr.current().unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.resource_id, r.id);

        // The (resource, date) context survives, so toggling works without
        // choosing the date again.
        assert!(mgr.toggle_slot(3).await.unwrap());
    }

    #[tokio::test]
    async fn date_change_discards_selection() {
        let store = Arc::new(MemoryAvailabilityStore::new());
        let mut mgr = manager(store);
        let r = resource();
        mgr.select_date(&r, today(), today()).unwrap();
        mgr.toggle_slot(1).await.unwrap();

        mgr.select_date(&r, today(), today()).unwrap();
        assert!(mgr.current().unwrap().is_empty());
    }
}
