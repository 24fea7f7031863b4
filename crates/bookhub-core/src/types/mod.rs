//! Shared value types: typed identifiers and money.

pub mod id;
pub mod money;

pub use id::{BookingId, ResourceId};
pub use money::Money;

/// 1-based index of a time slot within a resource's operating day.
///
/// Indices are unique per (resource, date); identity of a concrete slot is
/// the (resource, date, index) triple.
pub type SlotIndex = u16;
