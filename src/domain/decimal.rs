//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Share counts, money amounts and percentages all flow through this type.
//! There is no NaN or Infinity. Arithmetic whose result can grow without
//! bound goes through the `checked_*` methods or [`Decimal::safe_div`], which
//! report overflow as `None`; part-of-whole ratios use [`Decimal::fraction_of`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for cap-table arithmetic.
///
/// Serializes to JSON number (not string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    /// Returns the value 100.
    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    /// Convert a 0..100 percentage into a 0..1 fraction.
    pub fn from_percent(percent: Decimal) -> Self {
        percent / Decimal::hundred()
    }

    /// Convert a 0..1 fraction into a 0..100 percentage.
    pub fn to_percent(&self) -> Self {
        *self * Decimal::hundred()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    pub fn min(self, other: Decimal) -> Self {
        Decimal(self.0.min(other.0))
    }

    pub fn max(self, other: Decimal) -> Self {
        Decimal(self.0.max(other.0))
    }

    pub fn checked_add(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    pub fn checked_sub(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// Division where a zero divisor yields zero.
    ///
    /// Returns `None` only when the quotient overflows.
    pub fn safe_div(self, divisor: Decimal) -> Option<Self> {
        if divisor.is_zero() {
            return Some(Decimal::zero());
        }
        self.0.checked_div(divisor.0).map(Decimal)
    }

    /// `self / whole` for a part of a non-negative whole, clamped to [0, 1].
    ///
    /// A whole that is not positive yields zero. The quotient is bounded, so
    /// this cannot overflow.
    pub fn fraction_of(self, whole: Decimal) -> Self {
        if !whole.is_positive() {
            return Decimal::zero();
        }
        let part = self.0.max(RustDecimal::ZERO).min(whole.0);
        Decimal(part / whole.0)
    }

    /// Round to `dp` decimal places, midpoint away from zero.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Lossy conversion used for logging only.
    pub fn to_f64_lossy(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal(RustDecimal::from(value))
    }
}

// Arithmetic operations
impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, x| acc + *x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_decimal_canonical_no_exponent() {
        let formatted = d("10000000.000").to_canonical_string();
        assert!(!formatted.contains('e'));
        assert_eq!(formatted, "10000000");
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a = d("10.5");
        let b = d("2.5");
        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((a * b).to_canonical_string(), "26.25");
        assert_eq!((a / b).to_canonical_string(), "4.2");
    }

    #[test]
    fn test_safe_div_by_zero_is_zero() {
        assert_eq!(d("5").safe_div(Decimal::zero()), Some(Decimal::zero()));
        assert_eq!(d("5").safe_div(d("2")), Some(d("2.5")));
    }

    #[test]
    fn test_safe_div_reports_overflow() {
        assert_eq!(d("100000000000000000000").safe_div(d("0.0000000001")), None);
    }

    #[test]
    fn test_checked_mul_reports_overflow() {
        assert_eq!(d("100000000000000000000").checked_mul(d("100000000000000000000")), None);
        assert_eq!(d("10000000000").checked_mul(d("3")), Some(d("30000000000")));
    }

    #[test]
    fn test_fraction_of_is_clamped() {
        assert_eq!(d("1").fraction_of(d("4")), d("0.25"));
        assert_eq!(d("8").fraction_of(d("4")), Decimal::one());
        assert_eq!(d("-1").fraction_of(d("4")), Decimal::zero());
        assert_eq!(d("1").fraction_of(Decimal::zero()), Decimal::zero());
    }

    #[test]
    fn test_percent_conversions() {
        assert_eq!(Decimal::from_percent(d("20")), d("0.2"));
        assert_eq!(d("0.125").to_percent(), d("12.5"));
    }

    #[test]
    fn test_round_dp_midpoint_away_from_zero() {
        assert_eq!(d("4.995").round_dp(2), d("5.00"));
        assert_eq!(d("4.994").round_dp(2), d("4.99"));
        assert_eq!(d("0.125").round_dp(2), d("0.13"));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(d("5").min(d("8")), d("5"));
        assert_eq!(d("5").max(d("8")), d("8"));
    }

    #[test]
    fn test_sum() {
        let values = vec![d("1.5"), d("2.5"), d("6")];
        let total: Decimal = values.iter().sum();
        assert_eq!(total, d("10"));
    }

    #[test]
    fn test_decimal_json_serialization() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert!(json.is_number());
        assert_eq!(json.to_string(), "123.456");
    }

    #[test]
    fn test_decimal_deserializes_from_json_number() {
        let parsed: Decimal = serde_json::from_str("2000000").unwrap();
        assert_eq!(parsed, d("2000000"));
    }
}
