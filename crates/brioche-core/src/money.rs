//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:  0.1 + 0.2 = 0.30000000000000004
//!
//! The system this replaces manipulated amounts as native floats before
//! serializing them to decimal strings - a latent precision risk across
//! many small line items.
//!
//! OUR SOLUTION: integer cents. 1000 cents / 3 = 333 cents (x3 = 999).
//! We KNOW we lost 1 cent, and handle it explicitly.
//! ```
//!
//! ## Usage
//! ```rust
//! use brioche_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let line = price * 3;                      // 32.97
//! let total = line - Money::from_cents(500); // 27.97
//!
//! // NEVER from floats - no such constructor exists.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are representable (refunds, and the
///   documented design gap of a discount exceeding the subtotal)
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support, serialized as a bare integer
///
/// Every monetary value in the system flows through this type:
/// product prices, line subtotals, transaction totals, change due,
/// revenue and profit aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use brioche_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
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

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use brioche_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // 2.99
    /// let line_subtotal = unit_price.multiply_quantity(3);
    /// assert_eq!(line_subtotal.cents(), 897); // 8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// For debugging and logs; currency symbols and localization are the
/// consumer's concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Default money is zero.
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3i64;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 400);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    /// Documents the intentional precision behavior: splitting 10.00 three
    /// ways loses one cent, and we can observe exactly one cent lost.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_cents(1000);
        let one_third = Money::from_cents(1000 / 3); // 333 cents
        let reconstructed: Money = one_third * 3i64; // 999 cents

        assert_eq!(reconstructed.cents(), 999);
        assert_eq!((ten - reconstructed).cents(), 1);
    }
}
