//! # bookhub-entity
//!
//! Domain entity models for BookHub. Pure data types with their intrinsic
//! invariants; all orchestration lives in `bookhub-engine`.

pub mod booking;
pub mod calendar;
pub mod resource;
pub mod selection;
pub mod slot;

pub use booking::Booking;
pub use calendar::{CalendarCell, CalendarDay};
pub use resource::Resource;
pub use selection::Selection;
pub use slot::{SlotAvailability, SlotKey, TimeSlot};
