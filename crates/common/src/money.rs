//! Monetary amounts held as integer cents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

/// Errors produced when parsing a decimal money string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a whole dollar value.
    pub fn from_dollars(dollars: i64) -> Self {
        Self {
            cents: dollars * 100,
        }
    }

    /// Parses a decimal string such as `"999.99"` or `"$3.5"`.
    ///
    /// Digits past the second decimal place are rounded half-up to the cent.
    pub fn from_decimal_str(input: &str) -> Result<Self, MoneyParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let (whole, fraction) = rest.split_once('.').unwrap_or((rest, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(MoneyParseError::Invalid(input.to_string()));
        }

        let out_of_range = || MoneyParseError::OutOfRange(input.to_string());
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };

        let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_digit = fraction_digits.next().unwrap_or(0);

        let mut cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths))
            .ok_or_else(out_of_range)?;
        if round_digit >= 5 {
            cents = cents.checked_add(1).ok_or_else(out_of_range)?;
        }

        Ok(Self {
            cents: if negative { -cents } else { cents },
        })
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity. Returns `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts. Returns `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.cents.checked_add(other.cents).map(Money::from_cents)
    }

    /// Sums amounts. Returns `None` on overflow.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}
