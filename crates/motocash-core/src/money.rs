//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a month of decimal amounts in floating point:                  │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Net profit = profit − fixed costs must hold EXACTLY, so every          │
//! │  amount is held as integer cents and only the edges convert:           │
//! │                                                                         │
//! │    JSON 12.5 ──► from_decimal ──► 1250 cents ──► ... ──► to_decimal    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use motocash_core::money::Money;
//!
//! let fare = Money::from_cents(1099);        // 10.99
//! let tip = Money::from_decimal(2.5);        // 2.50
//! assert_eq!((fare + tip).cents(), 1349);
//! ```
//!
//! ## Wire Format
//! The persisted document stores amounts as decimal numbers in major units,
//! so `Money` (de)serializes as a number like `12.5`, rounding to the
//! nearest cent on the way in.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit is routinely negative on a bad day
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Currency-agnostic**: symbol and locale belong to presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use motocash_core::money::Money;
    ///
    /// let fare = Money::from_cents(1099);
    /// assert_eq!(fare.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal amount in major units to cents.
    ///
    /// Rounds half away from zero. Non-finite input becomes zero.
    ///
    /// ## Example
    /// ```rust
    /// use motocash_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.346).cents(), 1235);
    /// assert_eq!(Money::from_decimal(-3.336).cents(), -334);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(value: f64) -> Self {
        if !value.is_finite() {
            return Money::zero();
        }
        Money((value * 100.0).round() as i64)
    }

    /// Returns the value as a decimal number of major units.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Divides the amount by a positive quantity, rounding to the cent.
    ///
    /// Used for rates such as profit per hour. A zero, negative or
    /// non-finite divisor yields zero instead of NaN.
    ///
    /// ## Example
    /// ```rust
    /// use motocash_core::money::Money;
    ///
    /// let profit = Money::from_cents(10_000);
    /// assert_eq!(profit.divide_by(3.0).cents(), 3333);
    /// assert_eq!(profit.divide_by(0.0), Money::zero());
    /// ```
    pub fn divide_by(&self, divisor: f64) -> Money {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Money::zero();
        }
        Money::from_cents((self.0 as f64 / divisor).round() as i64)
    }

    /// Returns this amount as a percentage of `base`.
    ///
    /// `None` when the base is zero or negative.
    ///
    /// ## Example
    /// ```rust
    /// use motocash_core::money::Money;
    ///
    /// let earned = Money::from_cents(45_000);
    /// let goal = Money::from_cents(100_000);
    /// assert_eq!(earned.percent_of(goal), Some(45.0));
    /// assert_eq!(earned.percent_of(Money::zero()), None);
    /// ```
    pub fn percent_of(&self, base: Money) -> Option<f64> {
        if base.0 <= 0 {
            return None;
        }
        Some(self.0 as f64 * 100.0 / base.0 as f64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as a plain decimal, e.g. `-1234.56`.
///
/// ## Note
/// For terminal/UI output use the presentation formatter, which adds the
/// currency symbol and locale separators.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` shows up in hand-edited documents; treat it as zero
        let value = Option::<f64>::deserialize(deserializer)?;
        Ok(value.map(Money::from_decimal).unwrap_or_default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_from_decimal_rounds_to_cent() {
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(27.896).cents(), 2790);
        assert_eq!(Money::from_decimal(-3.333).cents(), -333);
        assert_eq!(Money::from_decimal(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.cents(), 1499);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_cents(1), Money::from_cents(2), Money::from_cents(3)];
        let by_ref: Money = amounts.iter().sum();
        let by_value: Money = amounts.into_iter().sum();
        assert_eq!(by_ref.cents(), 6);
        assert_eq!(by_value, by_ref);
    }

    #[test]
    fn test_divide_by_guards_denominator() {
        let profit = Money::from_cents(15_000);
        assert_eq!(profit.divide_by(2.5).cents(), 6000);
        assert_eq!(profit.divide_by(-1.0), Money::zero());
        assert_eq!(profit.divide_by(f64::NAN), Money::zero());
    }

    #[test]
    fn test_percent_of() {
        let value = Money::from_cents(120_000);
        assert_eq!(value.percent_of(Money::from_cents(100_000)), Some(120.0));
        assert_eq!(value.percent_of(Money::from_cents(-1)), None);
    }

    #[test]
    fn test_json_is_decimal_number() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");

        let parsed: Money = serde_json::from_str("7.99").unwrap();
        assert_eq!(parsed.cents(), 799);

        let integer: Money = serde_json::from_str("40").unwrap();
        assert_eq!(integer.cents(), 4000);

        let null: Money = serde_json::from_str("null").unwrap();
        assert!(null.is_zero());
    }
}
