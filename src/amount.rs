//! Fixed-point monetary amount with 2 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so that every amount
//! written to a layout line has exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

/// A monetary amount that always carries exactly 2 decimal places.
///
/// Values with more precision are rounded half away from zero, so `10.005`
/// becomes `10.01` and `10.004` becomes `10.00`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use payroll_layout::Amount;
///
/// let amount = Amount::from_str("15000").unwrap();
/// assert_eq!(amount.to_string(), "15000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Returns `true` if this value is below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Parses a plain `digits.dd` amount exactly as written, without
    /// rounding. Signs, separators, exponents and any other scale are
    /// rejected.
    pub fn parse_exact(s: &str) -> Option<Self> {
        let (units, cents) = s.split_once('.')?;
        let is_digits =
            |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(units) || !is_digits(cents) || cents.len() != Self::SCALE as usize {
            return None;
        }
        Decimal::from_str(s).ok().map(Amount)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
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

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
