//! Type-safe price representation using decimal arithmetic.
//!
//! The shop API serves prices as decimal strings in USD; this newtype keeps
//! them in `rust_decimal::Decimal` end to end so cart totals never touch
//! floating point. Rounding happens only when a price is formatted for
//! display.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit or total price in USD.
///
/// Serializes as a decimal string (e.g., `"24.99"`), matching the shop API's
/// wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (line totals).
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    /// Formats as `$x.xx`, rounded to cents for display only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(usd("10").to_string(), "$10.00");
        assert_eq!(usd("24.99").to_string(), "$24.99");
        assert_eq!(usd("0.126").to_string(), "$0.13");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [usd("24.99").times(2), usd("249.99").times(1)]
            .into_iter()
            .sum();
        assert_eq!(total, usd("299.97"));
    }

    #[test]
    fn test_serde_decimal_string() {
        let price = usd("19.95");
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.95\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
