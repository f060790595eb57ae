//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront trades in a single currency (Turkish lira), so [`Price`]
//! wraps a bare non-negative [`Decimal`] amount rather than carrying a
//! currency code. Multi-currency support would extend this type, not the
//! call sites.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount in the shop currency.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use velora_core::Price;
///
/// let unit = Price::new(Decimal::new(2500, 0)).expect("non-negative");
/// let line = unit.times(2);
/// assert_eq!(line.amount(), Decimal::new(5000, 0));
/// assert_eq!(line.to_string(), "₺5000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply the price by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether this price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{20ba}{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
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

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn test_rejects_negative_amounts() {
        assert_eq!(
            Price::new(dec(-1, 2)),
            Err(PriceError::Negative(dec(-1, 2)))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let a = Price::new(dec(2500, 0)).expect("price");
        let b = Price::new(dec(650, 0)).expect("price");

        assert_eq!(a.times(3).amount(), dec(7500, 0));

        let total: Price = [a, b].into_iter().sum();
        assert_eq!(total.amount(), dec(3150, 0));
    }

    #[test]
    fn test_display_formats_two_decimals() {
        let price = Price::new(dec(18005, 1)).expect("price");
        assert_eq!(price.to_string(), "\u{20ba}1800.50");
        assert_eq!(Price::ZERO.to_string(), "\u{20ba}0.00");
    }

    #[test]
    fn test_serde_rejects_negative_wire_values() {
        let ok: Result<Price, _> = serde_json::from_str("\"1250.00\"");
        assert!(ok.is_ok());

        let err: Result<Price, _> = serde_json::from_str("\"-3\"");
        assert!(err.is_err());
    }
}
