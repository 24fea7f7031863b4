//! # bookhub-engine
//!
//! Scheduling logic for BookHub. The generators ([`calendar`], [`slots`])
//! are pure functions of their inputs; [`selection`] holds one session's
//! in-progress choice; [`reservation`] orchestrates the whole booking flow
//! as an explicit state machine over the availability store.

pub mod calendar;
pub mod catalog;
pub mod pricing;
pub mod reservation;
pub mod selection;
pub mod slots;

pub use calendar::CalendarGenerator;
pub use catalog::ResourceCatalog;
pub use pricing::PricingEngine;
pub use reservation::{ReservationService, ReservationState};
pub use selection::SelectionManager;
pub use slots::SlotGenerator;
