//! Monetary amounts with precise decimal arithmetic
//!
//! This module provides the canonical representation of remittance and export
//! values: a non-negative decimal with at most 18 integer digits and 2
//! fractional digits, backed by rust_decimal so no binary floating point is
//! ever involved in a money comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of digits allowed before the decimal point
pub const MAX_INTEGER_DIGITS: usize = 18;

/// Canonical scale for stored amounts
pub const SCALE: u32 = 2;

/// Errors that can occur during amount operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    #[error("Amount exceeds {MAX_INTEGER_DIGITS} integer digits: {0}")]
    TooLarge(Decimal),

    #[error("Amount cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount
///
/// Amounts are canonicalized on construction: at most [`MAX_INTEGER_DIGITS`]
/// integer digits, fractional digits beyond [`SCALE`] truncated (never
/// rounded), and negative values rejected. Equality checks against stored
/// outstanding balances go through [`Amount::approx_eq`] with a 0.01 epsilon;
/// arithmetic stays exact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// The comparison tolerance used when matching allocated totals against
    /// stored outstanding balances
    pub fn epsilon() -> Decimal {
        dec!(0.01)
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Parses a free-text amount as entered by an operator or found in an
    /// import file
    ///
    /// Thousands separators (`,`) are stripped, at most one decimal point is
    /// accepted, fractional digits beyond two are truncated, and anything
    /// else (signs, letters, empty input, more than 18 integer digits) is
    /// rejected.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let invalid = || MoneyError::InvalidAmount(raw.to_string());

        let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() || cleaned.matches('.').count() > 1 {
            return Err(invalid());
        }

        let (int_part, frac_part) = match cleaned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (cleaned.as_str(), ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        if int_part.len() > MAX_INTEGER_DIGITS {
            return Err(invalid());
        }

        // Truncate, not round: 1.999 parses as 1.99
        let frac = &frac_part[..frac_part.len().min(SCALE as usize)];
        let canonical = match (int_part.is_empty(), frac.is_empty()) {
            (false, true) => int_part.to_string(),
            (false, false) => format!("{int_part}.{frac}"),
            (true, false) => format!("0.{frac}"),
            (true, true) => unreachable!("empty input rejected above"),
        };

        let value = Decimal::from_str(&canonical).map_err(|_| invalid())?;
        Self::try_from(value).map_err(|_| invalid())
    }

    /// Returns the underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition, rejecting results beyond the integer-digit cap
    pub fn checked_add(&self, other: Amount) -> Result<Amount, MoneyError> {
        Self::try_from(self.0 + other.0)
    }

    /// Checked subtraction, rejecting negative results
    pub fn checked_sub(&self, other: Amount) -> Result<Amount, MoneyError> {
        Self::try_from(self.0 - other.0)
    }

    /// Compares two amounts within the standard epsilon
    ///
    /// The comparison is strict: a full cent of difference is a real
    /// discrepancy, only sub-cent artifacts are absorbed.
    pub fn approx_eq(&self, other: Amount) -> bool {
        (self.0 - other.0).abs() < Self::epsilon()
    }

    /// Absolute difference between two amounts, as a raw decimal
    pub fn abs_diff(&self, other: Amount) -> Decimal {
        (self.0 - other.0).abs()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(value));
        }
        if value >= Decimal::from(10u64.pow(MAX_INTEGER_DIGITS as u32)) {
            return Err(MoneyError::TooLarge(value));
        }
        Ok(Self(value.trunc_with_scale(SCALE)))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Decimal {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let a = Amount::parse("1234.56").unwrap();
        assert_eq!(a.value(), dec!(1234.56));
    }

    #[test]
    fn test_parse_strips_thousands_separators() {
        let a = Amount::parse("4,000,000").unwrap();
        assert_eq!(a.value(), dec!(4000000));
    }

    #[test]
    fn test_parse_truncates_extra_fraction_digits() {
        // Truncation, not rounding
        let a = Amount::parse("1.999").unwrap();
        assert_eq!(a.value(), dec!(1.99));
    }

    #[test]
    fn test_parse_bare_fraction() {
        let a = Amount::parse(".50").unwrap();
        assert_eq!(a.value(), dec!(0.50));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "   ", "abc", "1.2.3", "-5", "+5", "1,2a3", "."] {
            assert!(
                matches!(Amount::parse(raw), Err(MoneyError::InvalidAmount(_))),
                "expected rejection of {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_nineteen_integer_digits() {
        let raw = "1234567890123456789"; // 19 digits
        assert!(Amount::parse(raw).is_err());

        let raw18 = "123456789012345678"; // 18 digits, still fine
        assert!(Amount::parse(raw18).is_ok());
    }

    #[test]
    fn test_try_from_rejects_negative() {
        assert_eq!(
            Amount::try_from(dec!(-1)),
            Err(MoneyError::Negative(dec!(-1)))
        );
    }

    #[test]
    fn test_checked_sub_rejects_underflow() {
        let a = Amount::parse("10").unwrap();
        let b = Amount::parse("15").unwrap();
        assert!(matches!(a.checked_sub(b), Err(MoneyError::Negative(_))));
    }

    #[test]
    fn test_checked_add() {
        let a = Amount::parse("1800000").unwrap();
        let b = Amount::parse("1200000").unwrap();
        assert_eq!(a.checked_add(b).unwrap().value(), dec!(3000000));
    }

    #[test]
    fn test_approx_eq_is_strict_at_one_cent() {
        let a = Amount::parse("100.00").unwrap();
        let b = Amount::parse("100.01").unwrap();
        assert!(a.approx_eq(a));
        // One cent off is a real discrepancy
        assert!(!a.approx_eq(b));
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Amount::parse("5").unwrap().to_string(), "5.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_is_idempotent(int_part in 0u64..1_000_000_000u64, frac in 0u32..100u32) {
            let raw = format!("{int_part}.{frac:02}");
            let once = Amount::parse(&raw).unwrap();
            let twice = Amount::parse(&once.to_string()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn comma_grouping_never_changes_value(v in 0u64..1_000_000_000_000u64) {
            let plain = v.to_string();
            // Insert separators every three digits from the right
            let grouped: String = plain
                .as_bytes()
                .rchunks(3)
                .rev()
                .map(|c| std::str::from_utf8(c).unwrap())
                .collect::<Vec<_>>()
                .join(",");
            prop_assert_eq!(Amount::parse(&plain).unwrap(), Amount::parse(&grouped).unwrap());
        }

        #[test]
        fn add_then_sub_round_trips(a in 0u64..1_000_000u64, b in 0u64..1_000_000u64) {
            let x = Amount::parse(&a.to_string()).unwrap();
            let y = Amount::parse(&b.to_string()).unwrap();
            let sum = x.checked_add(y).unwrap();
            prop_assert_eq!(sum.checked_sub(y).unwrap(), x);
        }
    }
}
