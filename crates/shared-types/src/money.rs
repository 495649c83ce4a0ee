//! # Fixed-Point Money
//!
//! Unit prices and totals are decimals with exactly two fractional digits.
//! Arithmetic goes through `rust_decimal`; binary floating point never touches
//! a price.
//!
//! Column shape follows the persisted schema: precision 10, scale 2, which
//! leaves at most 8 integer digits for a unit price.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by every amount.
pub const MONEY_SCALE: u32 = 2;

/// Maximum integer digits accepted for a unit price (precision 10, scale 2).
pub const MAX_INTEGER_DIGITS: u32 = 8;

/// Errors from parsing a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The input is not a number.
    #[error("is not a number")]
    NotANumber,

    /// The input does not fit in the column.
    #[error("must have at most {MAX_INTEGER_DIGITS} digits before the decimal point")]
    OutOfRange,
}

/// A fixed-point amount with two fractional digits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero, rendered as `0.00`.
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// Build an amount from a count of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    /// Normalize an arbitrary decimal to two fractional digits, rounding
    /// half away from zero.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        Money(rounded)
    }

    /// Parse user input such as `"1234"`, `"250.5"` or `" 99.999 "`.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let value = Decimal::from_str(input.trim()).map_err(|_| MoneyError::NotANumber)?;
        let money = Self::from_decimal(value);
        let limit = Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS));
        if money.0.abs() >= limit {
            return Err(MoneyError::OutOfRange);
        }
        Ok(money)
    }

    /// The underlying decimal.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by an integer quantity.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Money {
        Self::from_decimal(self.0 * Decimal::from(quantity))
    }

    /// Currency rendering with thousands separators, e.g. `$1,234.00`.
    #[must_use]
    pub fn to_currency_string(&self) -> String {
        let plain = Self::from_decimal(self.0.abs()).0.to_string();
        let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if self.0.is_sign_negative() && !self.0.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}${grouped}.{fraction}")
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Self::from_decimal(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::from_decimal(self.0).0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
