//! Selection pricing.

use bookhub_core::types::Money;
use bookhub_entity::Resource;

/// Converts a selection into a total charge.
///
/// Deterministic and pure: `total = hourly_rate × (slots × 0.5h)`, computed
/// in minor units. Zero slots price to zero; confirmability of an empty
/// selection is rejected upstream, not here.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    /// Slot length in minutes, used to convert slot counts to hours.
    slot_duration_minutes: u32,
}

impl PricingEngine {
    /// Create a pricing engine for the venue slot length.
    pub fn new(slot_duration_minutes: u32) -> Self {
        Self {
            slot_duration_minutes,
        }
    }

    /// Total charge for `slot_count` slots of a resource.
    ///
    /// The per-slot charge is rounded half a paisa up once and then scaled
    /// by the count, so the total is exactly linear in the slot count.
    pub fn price(&self, resource: &Resource, slot_count: usize) -> Money {
        // rate × minutes / 60 in integer paise, rounded once per slot.
        let per_slot = Money::from_minor(
            (resource
                .hourly_rate
                .times(self.slot_duration_minutes)
                .minor_units()
                + 30)
                / 60,
        );
        per_slot.times(slot_count as u32)
    }
}
