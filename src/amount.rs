//! Money amount backed by native floating-point arithmetic.
//!
//! Sums built from floating-point division rarely land exactly on their
//! target, so validation and reporting compare amounts against
//! [`Amount::TOLERANCE`] rather than using bit equality.

use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount.
///
/// Wraps an `f64` and formats with two decimal places.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use expense_ledger::Amount;
///
/// let amount = Amount::from_str(" 30 ").unwrap();
/// assert_eq!(amount.to_string(), "30.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount(f64);

impl Amount {
    /// Absolute tolerance used for sum checks and zero detection.
    pub const TOLERANCE: f64 = 1e-6;

    /// Zero value.
    pub const ZERO: Self = Amount(0.0);

    /// Wraps a raw `f64`.
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns the raw `f64`.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if this value is within tolerance of zero.
    pub fn is_zero(self) -> bool {
        self.0.abs() <= Self::TOLERANCE
    }

    /// Returns `true` if both amounts differ by at most [`Amount::TOLERANCE`].
    pub fn approx_eq(self, other: Amount) -> bool {
        (self.0 - other.0).abs() <= Self::TOLERANCE
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn abs(self) -> Self {
        Amount(self.0.abs())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<f64>().map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_trims_whitespace() {
        let a = Amount::from_str("  12.5  ").unwrap();
        assert_eq!(a.value(), 12.5);
        assert!(Amount::from_str("twelve").is_err());
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Amount::new(30.0).to_string(), "30.00");
        assert_eq!(Amount::new(100.0 / 3.0).to_string(), "33.33");
        assert_eq!(Amount::new(-5.0).to_string(), "-5.00");
    }

    #[test]
    fn test_tolerance_comparisons() {
        let third = Amount::new(100.0 / 3.0);
        let sum: Amount = [third, third, third].into_iter().sum();

        assert!(sum.approx_eq(Amount::new(100.0)));
        assert!(!Amount::new(100.01).approx_eq(Amount::new(100.0)));
        assert!((Amount::new(0.1) + Amount::new(0.2) - Amount::new(0.3)).is_zero());
        assert!(!Amount::new(0.01).is_zero());
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Amount::new(10.0);
        a += Amount::new(5.0);
        a -= Amount::new(2.5);

        assert_eq!(a, Amount::new(12.5));
        assert_eq!(-a, Amount::new(-12.5));
        assert!((-a).is_negative());
        assert_eq!((-a).abs(), a);
    }
}
