//! Money represented in integer minor units.
//!
//! Amounts are stored in paise (1/100 of a rupee) so that pricing
//! arithmetic never accumulates binary floating-point error. The only
//! rounding performed anywhere is at the currency's minor-unit precision.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// An amount of money in integer minor units (paise).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units (paise).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create an amount from whole major units (rupees).
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// The amount in minor units (paise).
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Multiply the amount by a whole count, saturating on overflow.
    pub fn times(self, count: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(count)))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = self.0 / 100;
        let paise = (self.0 % 100).abs();
        if paise == 0 {
            write!(f, "₹{rupees}")
        } else {
            write!(f, "₹{rupees}.{paise:02}")
        }
    }
}
