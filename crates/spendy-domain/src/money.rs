//! Fixed-point money amounts stored as integer minor units.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// An amount of money in hundredths of the currency unit.
///
/// Accumulating in integer cents keeps long sums of small transactions exact.
/// Transaction amounts are never negative; derived values such as a balance may be.
/// Arithmetic saturates at the `i64` bounds instead of wrapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// Largest amount a single transaction may carry: ten trillion major units.
    pub const MAX_AMOUNT: Cents = Cents(1_000_000_000_000_000);

    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True when the value is a valid transaction amount.
    pub fn is_valid_amount(self) -> bool {
        (0..=Self::MAX_AMOUNT.0).contains(&self.0)
    }

    /// Coerces a decimal string such as `"12.5"` into cents.
    ///
    /// More than two fractional digits are rounded half away from zero.
    /// Negative and non-numeric input is rejected, as is anything above
    /// [`Cents::MAX_AMOUNT`].
    pub fn parse_amount(input: &str) -> Result<Self, AmountError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(AmountError::Empty);
        }
        let unsigned = match raw.strip_prefix('-') {
            Some(rest) => {
                if rest.chars().any(|c| c.is_ascii_digit() && c != '0') {
                    return Err(AmountError::Negative(raw.to_string()));
                }
                rest
            }
            None => raw.strip_prefix('+').unwrap_or(raw),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::NotNumeric(raw.to_string()));
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::NotNumeric(raw.to_string()));
        }

        let units: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountError::Overflow(raw.to_string()))?
        };
        let mut digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().map(|d| d >= 5).unwrap_or(false);

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
            .map(Cents)
            .filter(|cents| cents.is_valid_amount())
            .ok_or_else(|| AmountError::Overflow(raw.to_string()))
    }
}

impl FromStr for Cents {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cents::parse_amount(s)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Cents {
    fn sub_assign(&mut self, rhs: Cents) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Cents {
    type Output = Cents;

    fn neg(self) -> Cents {
        Cents(self.0.saturating_neg())
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Cents> for Cents {
    fn sum<I: Iterator<Item = &'a Cents>>(iter: I) -> Cents {
        iter.copied().sum()
    }
}

/// Failure to coerce user input into a non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    NotNumeric(String),
    Negative(String),
    Overflow(String),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("amount is required"),
            AmountError::NotNumeric(raw) => write!(f, "amount `{raw}` is not a number"),
            AmountError::Negative(raw) => write!(f, "amount `{raw}` must not be negative"),
            AmountError::Overflow(raw) => write!(f, "amount `{raw}` is too large"),
        }
    }
}

impl std::error::Error for AmountError {}
