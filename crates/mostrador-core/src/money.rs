//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The price form re-derives one field from the other two on every       │
//! │  keystroke:                                                             │
//! │    final = base × (1 − d)        base = final / (1 − d)                │
//! │                                                                         │
//! │  With floats, 100 → 90 → 100.00000000000001 after a round trip.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                            │
//! │    10000¢ × 9000 / 10000 = 9000¢                                       │
//! │     9000¢ × 10000 / 9000 = 10000¢   (exact, every time)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The backend speaks decimal JSON numbers (`"precio": 9000.5`). Money
//! itself serializes as cents; wire structs opt into decimals with
//! `#[serde(with = "crate::money::decimal")]`.
//!
//! ## Usage
//! ```rust
//! use mostrador_core::money::Money;
//! use mostrador_core::types::DiscountRate;
//!
//! let price = Money::from_cents(10_000); // $100,00
//! let final_price = price.apply_discount(DiscountRate::from_percentage(10.0));
//! assert_eq!(final_price.cents(), 9_000);
//! assert_eq!(final_price.remove_discount(DiscountRate::from_percentage(10.0)), Some(price));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::format::format_amount_es;
use crate::types::DiscountRate;

/// Basis points in 100%.
const FULL_BPS: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (the smallest unit of the peso).
///
/// ## Design Decisions
/// - **i64 (signed)**: exchange sales carry negative totals
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Rounding**: half away from zero, once per derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (as typed or as received from the
    /// backend) to cents, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities and amounts outside the
    /// representable range. Callers treat `None` as a blank field.
    ///
    /// ```rust
    /// use mostrador_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.345), Some(Money::from_cents(1235)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents >= i64::MAX as f64 || cents <= i64::MIN as f64 {
            return None;
        }
        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal (for the wire and for display only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage discount: `self × (1 − d)`, rounded to cents.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::types::DiscountRate;
    ///
    /// let base = Money::from_cents(50_000); // $500,00
    /// let rate = DiscountRate::from_percentage(20.0);
    /// assert_eq!(base.apply_discount(rate).cents(), 40_000);
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let remaining = FULL_BPS - rate.bps() as i128;
        Money(div_round(self.0 as i128 * remaining, FULL_BPS) as i64)
    }

    /// Inverse of [`apply_discount`](Self::apply_discount): recovers the
    /// base price that yields `self` after the discount.
    ///
    /// Returns `None` when the base price does not fit in an `i64` of cents
    /// (a final price near the limit with a discount close to 100%).
    ///
    /// ## Zero Guard
    /// A 100% discount leaves nothing to divide by; the base price is then
    /// taken to be the final price itself.
    ///
    /// ```rust
    /// use mostrador_core::money::Money;
    /// use mostrador_core::types::DiscountRate;
    ///
    /// let final_price = Money::from_cents(8_000);
    /// let base = final_price.remove_discount(DiscountRate::from_percentage(20.0));
    /// assert_eq!(base, Some(Money::from_cents(10_000))); // 80 / 0.8
    ///
    /// let full = DiscountRate::from_percentage(100.0);
    /// assert_eq!(final_price.remove_discount(full), Some(final_price));
    /// ```
    pub fn remove_discount(&self, rate: DiscountRate) -> Option<Money> {
        if rate.is_full() {
            return Some(*self);
        }
        let remaining = FULL_BPS - rate.bps() as i128;
        i64::try_from(div_round(self.0 as i128 * FULL_BPS, remaining))
            .ok()
            .map(Money)
    }

    /// Multiplies money by a quantity (line totals, stock cost totals).
    /// `None` on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Divides evenly, rounding to the nearest cent. Returns zero when
    /// `count` is zero (an average over nothing).
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(div_round(self.0 as i128, count as i128) as i64)
    }
}

/// Integer division rounding half away from zero. `den` must be positive.
fn div_round(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Displays money the way the shop reads it: `$12.345,67`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, format_amount_es(self.abs()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Serde helpers for decimal wire fields
// =============================================================================

/// `#[serde(with = "crate::money::decimal")]` for `Money` fields that travel
/// as decimal JSON numbers.
pub mod decimal {
    use super::Money;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Money::from_decimal(raw).ok_or_else(|| D::Error::custom(format!("invalid amount: {raw}")))
    }
}

/// Same as [`decimal`] for `Option<Money>`; `null` and absent map to `None`.
pub mod decimal_opt {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(m) => serializer.serialize_some(&m.to_decimal()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.and_then(Money::from_decimal))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
