//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The commerce API sends prices as JSON numbers or as display strings:  │
//! │    "price": 4.5          "price": "$12.99"                              │
//! │                                                                         │
//! │  Summing them as floats drifts:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: convert once at the wire boundary into integers        │
//! │  (UnitPrice micro-units for unit prices, Money cents for totals),      │
//! │  then every item total and subtotal is exact integer math.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2i64;            // $21.98
//! assert_eq!(doubled.cents(), 2198);
//!
//! // Wire strings are parsed without going through floats
//! assert_eq!(Money::from_decimal_str("12.99"), Some(Money::from_cents(1299)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: the wire may carry negative adjustments; totals are
///   clamped by the pricing functions, not by the type
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a JSON number (major units) into cents.
    ///
    /// Only used at the wire boundary. Non-finite values become zero and
    /// out-of-range values saturate.
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Parses a strict decimal string (`-12.5`, `.99`, `7.`) into cents.
    ///
    /// Digits beyond the second decimal place round half away from zero.
    /// Returns `None` when the string is not a plain decimal or overflows.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_str("-.5"), Some(Money::from_cents(-50)));
    /// assert_eq!(Money::from_decimal_str("1.005"), Some(Money::from_cents(101)));
    /// assert_eq!(Money::from_decimal_str("1.2.3"), None);
    /// assert_eq!(Money::from_decimal_str("-"), None);
    /// ```
    pub fn from_decimal_str(input: &str) -> Option<Self> {
        parse_scaled(input, 2).map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units, for display and interop only.
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
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

    /// Returns zero for negative amounts, the amount otherwise.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies money by a quantity, saturating instead of overflowing.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let line_total = Money::from_cents(299).multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Parses a strict decimal string into an integer with `scale` decimal
/// places. The first dropped digit rounds half away from zero.
fn parse_scaled(input: &str, scale: usize) -> Option<i64> {
    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for digit in int_part.bytes() {
        value = value.checked_mul(10)?.checked_add(i64::from(digit - b'0'))?;
    }

    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    for _ in 0..scale {
        value = value.checked_mul(10)?.checked_add(frac.next().unwrap_or(0))?;
    }
    if frac.next().is_some_and(|d| d >= 5) {
        value = value.checked_add(1)?;
    }

    Some(if negative { -value } else { value })
}

// =============================================================================
// Unit Price
// =============================================================================

/// Micro-units (1/1,000,000 of the major unit) per cent.
const MICROS_PER_CENT: i64 = 10_000;

/// A unit price kept to six decimal places.
///
/// Wire prices may carry sub-cent digits (`"0.335"`). Item totals multiply
/// the exact unit price by the quantity and round to cents once, at the end.
///
/// ```rust
/// use storefront_core::money::{Money, UnitPrice};
///
/// let unit = UnitPrice::from_decimal_str("0.335").unwrap();
/// assert_eq!(unit.multiply_quantity(3).to_money(), Money::from_cents(101));
/// assert_eq!(unit.to_money(), Money::from_cents(34));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnitPrice(i64);

impl UnitPrice {
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        UnitPrice(micros)
    }

    #[inline]
    pub const fn micros(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        UnitPrice(0)
    }

    /// Converts a JSON number (major units). Non-finite values become zero
    /// and out-of-range values saturate.
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return UnitPrice::zero();
        }
        UnitPrice((amount * 1_000_000.0).round() as i64)
    }

    /// Parses a strict decimal string. Digits beyond the sixth decimal place
    /// round half away from zero.
    pub fn from_decimal_str(input: &str) -> Option<Self> {
        parse_scaled(input, 6).map(UnitPrice)
    }

    /// Multiplies by a quantity, saturating instead of overflowing.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        UnitPrice(self.0.saturating_mul(qty))
    }

    /// Rounds to whole cents, half away from zero.
    pub const fn to_money(&self) -> Money {
        let cents = self.0 / MICROS_PER_CENT;
        let rest = self.0 % MICROS_PER_CENT;
        if rest >= MICROS_PER_CENT / 2 {
            Money(cents + 1)
        } else if rest <= -MICROS_PER_CENT / 2 {
            Money(cents - 1)
        } else {
            Money(cents)
        }
    }
}

impl From<Money> for UnitPrice {
    fn from(money: Money) -> Self {
        UnitPrice(money.0.saturating_mul(MICROS_PER_CENT))
    }
}

impl Add for UnitPrice {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        UnitPrice(self.0.saturating_add(other.0))
    }
}

impl Sum for UnitPrice {
    fn sum<I: Iterator<Item = UnitPrice>>(iter: I) -> Self {
        iter.fold(UnitPrice::zero(), Add::add)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering. Use `CurrencyFormatter` for anything shown to
/// shoppers so locale and currency are respected.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(i64::from(qty))
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_decimal_str_parsing() {
        assert_eq!(Money::from_decimal_str("12.99"), Some(Money::from_cents(1299)));
        assert_eq!(Money::from_decimal_str("12"), Some(Money::from_cents(1200)));
        assert_eq!(Money::from_decimal_str("7."), Some(Money::from_cents(700)));
        assert_eq!(Money::from_decimal_str(".5"), Some(Money::from_cents(50)));
        assert_eq!(Money::from_decimal_str("0.125"), Some(Money::from_cents(13)));
        assert_eq!(Money::from_decimal_str("-0.125"), Some(Money::from_cents(-13)));
        assert_eq!(Money::from_decimal_str(""), None);
        assert_eq!(Money::from_decimal_str("."), None);
        assert_eq!(Money::from_decimal_str("12a"), None);
        assert_eq!(Money::from_decimal_str("99999999999999999999"), None);
    }

    #[test]
    fn test_from_major_f64() {
        assert_eq!(Money::from_major_f64(4.5).cents(), 450);
        assert_eq!(Money::from_major_f64(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major_f64(f64::NAN), Money::zero());
        assert_eq!(Money::from_major_f64(f64::INFINITY), Money::zero());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3i64).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(42).clamp_non_negative().cents(), 42);
    }

    #[test]
    fn test_unit_price_rounds_once_after_quantity() {
        let unit = UnitPrice::from_decimal_str("0.335").unwrap();
        assert_eq!(unit.micros(), 335_000);
        assert_eq!(unit.multiply_quantity(3).to_money(), Money::from_cents(101));

        let eighth = UnitPrice::from_major_f64(0.125);
        assert_eq!(eighth.to_money(), Money::from_cents(13));
        assert_eq!(eighth.multiply_quantity(8).to_money(), Money::from_cents(100));

        assert_eq!(UnitPrice::from_decimal_str("-0.005").unwrap().to_money(), Money::from_cents(-1));
        assert_eq!(UnitPrice::from_decimal_str("-0.004").unwrap().to_money(), Money::zero());
        assert_eq!(UnitPrice::from_decimal_str("1.0000005").unwrap().micros(), 1_000_001);
        assert_eq!(UnitPrice::from(Money::from_cents(450)).to_money(), Money::from_cents(450));
        assert_eq!(UnitPrice::from_decimal_str("abc"), None);
    }

    #[test]
    fn test_multiply_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(4).cents(), i64::MAX);
    }
}
