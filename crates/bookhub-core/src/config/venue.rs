//! Venue scheduling configuration.

use serde::{Deserialize, Serialize};

/// Venue-wide scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Length of a bookable slot in minutes.
    #[serde(default = "default_slot_minutes")]
    pub slot_duration_minutes: u32,
    /// How many calendar months ahead of today may be booked.
    ///
    /// `1` means the current month only.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            slot_duration_minutes: default_slot_minutes(),
            horizon_months: default_horizon_months(),
        }
    }
}

fn default_slot_minutes() -> u32 {
    30
}

fn default_horizon_months() -> u32 {
    1
}
