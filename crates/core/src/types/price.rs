//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are kept unrounded; [`Price::rounded`] produces the two-decimal
//! value shown to shoppers. Totals composed from rounded prices drift, so
//! arithmetic always runs on the unrounded amount.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places used for display.
pub const DISPLAY_DECIMALS: u32 = 2;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// A derived amount does not fit in the decimal range.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// A non-negative amount in the store currency.
///
/// Deserializes from JSON numbers (`109.95`) or strings (`"109.95"`), and
/// rejects negative amounts.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::Price;
///
/// let price = Price::new(Decimal::new(1999, 2)).unwrap();
/// assert_eq!(price.to_string(), "$19.99");
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Get the unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Round half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiply by a non-negative factor and round for display.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product is out of range.
    pub fn scaled(&self, factor: Decimal) -> Result<Self, PriceError> {
        let amount = self
            .0
            .checked_mul(factor.abs())
            .ok_or(PriceError::Overflow)?;
        Ok(Self(amount.round_dp_with_strategy(
            DISPLAY_DECIMALS,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// `self * quantity`, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// `self + rhs`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded().0)
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let a: Price = serde_json::from_str("109.95").unwrap();
        let b: Price = serde_json::from_str("\"109.95\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.amount(), Decimal::new(10995, 2));
    }

    #[test]
    fn test_deserialize_negative_rejected() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_rounded_half_away_from_zero() {
        assert_eq!(price("0.125").rounded(), price("0.13"));
        assert_eq!(price("2.3449").rounded(), price("2.34"));
    }

    #[test]
    fn test_scaled() {
        assert_eq!(price("109.95").scaled(Decimal::new(13, 1)), Ok(price("142.94")));
        assert_eq!(price("109.95").scaled(Decimal::new(3, 1)), Ok(price("32.99")));
    }

    #[test]
    fn test_scaled_overflow_is_an_error() {
        let huge = price("70000000000000000000000000000");
        assert_eq!(huge.scaled(Decimal::new(13, 1)), Err(PriceError::Overflow));
        assert!(Price::MAX.scaled(Decimal::ONE).is_ok());
    }

    #[test]
    fn test_display_pads_two_decimals() {
        assert_eq!(price("10").to_string(), "$10.00");
        assert_eq!(price("5.5").to_string(), "$5.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let total = price("10.00")
            .checked_mul(1)
            .and_then(|a| price("5.50").checked_mul(2).and_then(|b| a.checked_add(b)));
        assert_eq!(total, Some(price("21.00")));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        assert_eq!(price("100000000000000000000").checked_mul(u32::MAX), None);
        assert_eq!(Price::MAX.checked_add(price("1")), None);
    }
}
