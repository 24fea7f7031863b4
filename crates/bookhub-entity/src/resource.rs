//! Bookable resource model.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use bookhub_core::BookingError;
use bookhub_core::result::BookingResult;
use bookhub_core::types::{Money, ResourceId};

/// A bookable item in the venue catalog (a game table, a hall).
///
/// Resources are immutable catalog data owned outside the engine; the
/// engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    /// Price per hour of use.
    pub hourly_rate: Money,
    /// Opening clock time of the operating window.
    pub open: NaiveTime,
    /// Closing clock time of the operating window.
    pub close: NaiveTime,
}

impl Resource {
    /// Create a validated resource.
    pub fn new(
        name: impl Into<String>,
        hourly_rate: Money,
        open: NaiveTime,
        close: NaiveTime,
    ) -> BookingResult<Self> {
        let resource = Self {
            id: ResourceId::new(),
            name: name.into(),
            hourly_rate,
            open,
            close,
        };
        resource.validate()?;
        Ok(resource)
    }

    /// Check the resource's intrinsic invariants.
    pub fn validate(&self) -> BookingResult<()> {
        if self.name.trim().is_empty() {
            return Err(BookingError::Validation(
                "resource name must not be empty".to_string(),
            ));
        }
        if !self.hourly_rate.is_positive() {
            return Err(BookingError::Validation(format!(
                "hourly rate must be positive, got {}",
                self.hourly_rate
            )));
        }
        if self.open >= self.close {
            return Err(BookingError::Validation(format!(
                "operating window must open before it closes ({} >= {})",
                self.open, self.close
            )));
        }
        Ok(())
    }

    /// Length of the operating window in minutes.
    pub fn operating_minutes(&self) -> i64 {
        (self.close - self.open).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn valid_resource_passes() {
        let r = Resource::new("Snooker Table 1", Money::from_major(100), t(9, 0), t(22, 0));
        assert!(r.is_ok());
        assert_eq!(r.unwrap().operating_minutes(), 13 * 60);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = Resource::new("PS5 Bay", Money::from_major(80), t(22, 0), t(9, 0)).unwrap_err();
        assert_eq!(err.kind(), bookhub_core::error::ErrorKind::Validation);
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        assert!(Resource::new("Free Table", Money::ZERO, t(9, 0), t(22, 0)).is_err());
    }
}
