//! The reservation flow as an explicit state machine.
//!
//! The original flow existed only as conditional rendering in a UI; here
//! every transition is checked, so confirming without a date or with an
//! empty selection is rejected by construction.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use bookhub_core::BookingError;
use bookhub_core::config::VenueConfig;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{BookingId, Money, ResourceId, SlotIndex};
use bookhub_entity::{Booking, CalendarCell, SlotAvailability, TimeSlot};
use bookhub_store::AvailabilityStore;

use crate::calendar::CalendarGenerator;
use crate::catalog::ResourceCatalog;
use crate::pricing::PricingEngine;
use crate::selection::SelectionManager;
use crate::slots::SlotGenerator;

/// States of one reservation attempt.
///
/// `Confirmed` and `Aborted` are terminal; a new attempt starts a fresh
/// service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    /// Nothing chosen yet.
    Idle,
    /// A bookable date is fixed; the selection is empty.
    DateChosen,
    /// At least one slot is selected.
    SlotsChosen,
    /// A commit against the store is in flight.
    Confirming,
    /// A booking was produced; the attempt is over.
    Confirmed,
    /// The caller walked away; nothing was persisted.
    Aborted,
}

impl ReservationState {
    /// State name for errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::DateChosen => "DateChosen",
            Self::SlotsChosen => "SlotsChosen",
            Self::Confirming => "Confirming",
            Self::Confirmed => "Confirmed",
            Self::Aborted => "Aborted",
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Aborted)
    }
}

/// Orchestrates one booking attempt for one session.
///
/// Exposes the engine's whole external interface: calendar and slot
/// listing, selection, pricing, atomic confirmation, and cancellation.
pub struct ReservationService {
    /// The venue's resource catalog.
    catalog: Arc<ResourceCatalog>,
    /// Authoritative availability store.
    store: Arc<dyn AvailabilityStore>,
    /// Calendar rules.
    calendar: CalendarGenerator,
    /// Slot geometry.
    slots: SlotGenerator,
    /// Pricing rules.
    pricing: PricingEngine,
    /// This session's in-progress selection.
    selection: SelectionManager,
    /// Current state of the attempt.
    state: ReservationState,
}

impl ReservationService {
    /// Create a fresh reservation attempt in `Idle`.
    pub fn new(
        catalog: Arc<ResourceCatalog>,
        store: Arc<dyn AvailabilityStore>,
        venue: &VenueConfig,
    ) -> BookingResult<Self> {
        let slots = SlotGenerator::new(venue.slot_duration_minutes)?;
        let calendar = CalendarGenerator::new(venue.horizon_months)?;
        Ok(Self {
            catalog,
            store: Arc::clone(&store),
            calendar,
            slots,
            pricing: PricingEngine::new(venue.slot_duration_minutes),
            selection: SelectionManager::new(store, slots, calendar),
            state: ReservationState::Idle,
        })
    }

    /// Current state of the attempt.
    pub fn state(&self) -> ReservationState {
        self.state
    }

    /// The month grid of selectable dates for a resource.
    pub fn list_calendar(
        &self,
        resource_id: ResourceId,
        year: i32,
        month: u32,
    ) -> BookingResult<Vec<CalendarCell>> {
        self.catalog.get(resource_id)?;
        self.calendar.month_grid(self.today(), year, month)
    }

    /// The slot list for a resource and date, with availability flags.
    pub async fn list_slots(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<SlotAvailability>> {
        let resource = self.catalog.get(resource_id)?;
        let shells = self.slots.for_resource(resource);
        let availability = self
            .store
            .query_availability(resource_id, date, shells.len() as SlotIndex)
            .await?;

        Ok(shells
            .into_iter()
            .map(|slot| SlotAvailability {
                available: availability.get(&slot.index).copied().unwrap_or(false),
                slot,
            })
            .collect())
    }

    /// Fix the (resource, date) context and move to `DateChosen`.
    ///
    /// Allowed from `Idle`, `DateChosen`, and `SlotsChosen`; choosing again
    /// discards whatever was selected.
    pub fn start_selection(
        &mut self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<()> {
        self.require_active("start selection")?;
        let resource = self.catalog.get(resource_id)?;
        self.selection.select_date(resource, date, self.today())?;
        self.transition(ReservationState::DateChosen);
        Ok(())
    }

    /// Toggle one slot; adds re-check availability against the store.
    pub async fn toggle_slot(&mut self, index: SlotIndex) -> BookingResult<bool> {
        self.require_active("toggle slot")?;
        let selected = self.selection.toggle_slot(index).await?;
        self.settle_selection_state();
        Ok(selected)
    }

    /// The currently selected slots, sorted by index.
    pub fn current_selection(&self) -> Vec<TimeSlot> {
        let Some(selection) = self.selection.current() else {
            return Vec::new();
        };
        let Ok(resource) = self.catalog.get(selection.resource_id) else {
            return Vec::new();
        };

        let shells = self.slots.for_resource(resource);
        selection
            .sorted_indices()
            .into_iter()
            .filter_map(|index| shells.get(index as usize - 1).copied())
            .collect()
    }

    /// Price the current selection at current rates.
    pub fn price_selection(&self) -> BookingResult<Money> {
        let Some(selection) = self.selection.current() else {
            return Ok(Money::ZERO);
        };
        let resource = self.catalog.get(selection.resource_id)?;
        Ok(self.pricing.price(resource, selection.len()))
    }

    /// Atomically confirm the selection into a booking.
    ///
    /// The total is re-priced here, not taken from an earlier quote, so a
    /// rate change between selection and confirmation is always honored.
    /// On a conflict the lost slots are dropped from the selection, the
    /// machine returns to `SlotsChosen` (or `DateChosen` if nothing
    /// survived), and the error names exactly what was lost.
    pub async fn confirm(&mut self) -> BookingResult<Booking> {
        match self.state {
            ReservationState::SlotsChosen => {}
            // A date without slots is a zero-slot confirm, not an
            // out-of-order call.
            ReservationState::DateChosen => return Err(BookingError::EmptySelection),
            _ => {
                return Err(BookingError::InvalidTransition {
                    from: self.state.name(),
                    operation: "confirm",
                });
            }
        }
        let selection = self
            .selection
            .current()
            .ok_or(BookingError::EmptySelection)?;

        let resource = self.catalog.get(selection.resource_id)?;
        let total = self.pricing.price(resource, selection.len());
        let indices = selection.sorted_indices();
        let (resource_id, date) = (selection.resource_id, selection.date);

        self.transition(ReservationState::Confirming);
        let result = self.store.try_commit(resource_id, date, &indices, total).await;
        match result {
            Ok(booking) => {
                self.selection.reset();
                self.transition(ReservationState::Confirmed);
                info!(
                    booking_id = %booking.id,
                    total = %booking.total,
                    "Reservation confirmed"
                );
                Ok(booking)
            }
            Err(BookingError::Conflict { slots }) => {
                warn!(conflicts = ?slots, "Confirmation lost slots to a competing session");
                self.selection.drop_lost(&slots);
                self.settle_selection_state();
                Err(BookingError::Conflict { slots })
            }
            Err(other) => {
                // System failure: selection intact, caller may retry.
                self.transition(ReservationState::SlotsChosen);
                Err(other)
            }
        }
    }

    /// Abandon the attempt, discarding the selection.
    ///
    /// Allowed from `Idle`, `DateChosen`, and `SlotsChosen`.
    pub fn abort(&mut self) -> BookingResult<()> {
        self.require_active("abort")?;
        if self.state == ReservationState::Confirming {
            return Err(BookingError::InvalidTransition {
                from: self.state.name(),
                operation: "abort",
            });
        }
        self.selection.reset();
        self.transition(ReservationState::Aborted);
        Ok(())
    }

    /// Cancel a committed booking, releasing its slots.
    ///
    /// Independent of this session's state machine.
    pub async fn cancel_booking(&self, booking_id: BookingId) -> BookingResult<()> {
        self.store.cancel(booking_id).await
    }

    /// Look up a committed booking.
    pub async fn get_booking(&self, booking_id: BookingId) -> BookingResult<Booking> {
        self.store.get_booking(booking_id).await
    }

    /// All bookings for a resource on a date, oldest first.
    pub async fn list_bookings(
        &self,
        resource_id: ResourceId,
        date: NaiveDate,
    ) -> BookingResult<Vec<Booking>> {
        self.catalog.get(resource_id)?;
        self.store.list_bookings(resource_id, date).await
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Reject operations once the machine is terminal.
    fn require_active(&self, operation: &'static str) -> BookingResult<()> {
        if self.state.is_terminal() {
            return Err(BookingError::InvalidTransition {
                from: self.state.name(),
                operation,
            });
        }
        Ok(())
    }

    /// Derive `DateChosen` vs `SlotsChosen` from the selection size.
    fn settle_selection_state(&mut self) {
        let next = match self.selection.current() {
            Some(selection) if !selection.is_empty() => ReservationState::SlotsChosen,
            Some(_) => ReservationState::DateChosen,
            None => ReservationState::Idle,
        };
        self.transition(next);
    }

    fn transition(&mut self, next: ReservationState) {
        if self.state != next {
            debug!(from = self.state.name(), to = next.name(), "State transition");
            self.state = next;
        }
    }
}
