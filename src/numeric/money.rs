// ============================================================================
// Price and Money
// Integer cent amounts with checked arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::Quantity;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Limit or execution price in minor currency units (cents).
///
/// Prices are never negative, so the inner value is unsigned. Ordering is the
/// natural integer ordering; which end of the book is "better" is decided by
/// [`Side`](crate::domain::Side), not by the price type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Price(u64);

impl Price {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    #[inline]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Value of `quantity` shares at this price.
    ///
    /// # Errors
    /// Returns `Overflow` if the notional does not fit in [`Money`].
    pub fn checked_notional(self, quantity: Quantity) -> NumericResult<Money> {
        let product = (self.0 as i128) * (quantity as i128);
        i64::try_from(product)
            .map(Money)
            .map_err(|_| NumericError::Overflow)
    }

    /// Returns true when this price sits on the `tick` grid.
    /// A zero tick accepts every price.
    pub fn is_on_tick(self, tick: Price) -> bool {
        tick.0 == 0 || self.0 % tick.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dollars(f, false, self.0)
    }
}

/// Signed amount of money in minor currency units (cents).
///
/// Used for balances, trade values and fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    pub fn checked_add(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_add(rhs.0).map(Self).ok_or(if rhs.0 > 0 {
            NumericError::Overflow
        } else {
            NumericError::Underflow
        })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `Overflow` or `Underflow` if the result is out of range.
    pub fn checked_sub(self, rhs: Self) -> NumericResult<Self> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(if rhs.0 < 0 {
            NumericError::Overflow
        } else {
            NumericError::Underflow
        })
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Dollar value as a two-place decimal (cents are the scale).
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Converts a cent amount held as a decimal (e.g. `value × rate`) back to
    /// whole cents, rounding half away from zero.
    ///
    /// # Errors
    /// Returns `Overflow` if the rounded value does not fit in an `i64`.
    pub fn from_decimal_cents(cents: Decimal) -> NumericResult<Self> {
        cents
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
            .ok_or(NumericError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_dollars(f, self.0 < 0, self.0.unsigned_abs())
    }
}

/// Writes `cents` as `$1,234.56`, with a leading `-` when negative.
fn write_dollars(f: &mut fmt::Formatter<'_>, negative: bool, cents: u64) -> fmt::Result {
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    let text = format!("{}${}.{:02}", sign, grouped, cents % 100);
    f.pad(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notional() {
        let price = Price::from_cents(9_550);
        assert_eq!(price.checked_notional(3).unwrap(), Money::from_cents(28_650));
        assert_eq!(
            Price::from_cents(u64::MAX).checked_notional(2),
            Err(NumericError::Overflow)
        );
    }

    #[test]
    fn test_tick_grid() {
        assert!(Price::from_cents(150).is_on_tick(Price::from_cents(5)));
        assert!(!Price::from_cents(152).is_on_tick(Price::from_cents(5)));
        assert!(Price::from_cents(152).is_on_tick(Price::ZERO));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Money::from_cents(-100).to_string(), "-$1.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Price::from_cents(100_000).to_string(), "$1,000.00");
    }

    #[test]
    fn test_display_respects_width() {
        assert_eq!(format!("{:>8}", Price::from_cents(950)), "   $9.50");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(i64::MAX);
        assert_eq!(a.checked_add(Money::from_cents(1)), Err(NumericError::Overflow));
        assert_eq!(
            Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)),
            Err(NumericError::Underflow)
        );
        assert_eq!(
            Money::from_cents(10).checked_sub(Money::from_cents(25)).unwrap(),
            Money::from_cents(-15)
        );
    }

    #[test]
    fn test_decimal_round_trip_rounds_half_away() {
        assert_eq!(
            Money::from_decimal_cents(Decimal::new(125, 1)).unwrap(),
            Money::from_cents(13)
        );
        assert_eq!(
            Money::from_decimal_cents(Decimal::new(124, 1)).unwrap(),
            Money::from_cents(12)
        );
        assert_eq!(Money::from_cents(1_050).to_decimal(), Decimal::new(1050, 2));
    }
}
