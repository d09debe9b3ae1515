//! Non-negative currency amounts stored as whole cents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raised when a cost string cannot be read as a non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cost must be a non-negative amount with at most two decimal places")]
pub struct MoneyParseError;

/// Currency amount in cents.
///
/// Parsed from and rendered as a decimal string (`"12.50"`), so JSON
/// payloads and exports never go through floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero cost; the value used when no cost is supplied.
    pub const ZERO: Self = Self(0);

    /// Build from a cent count, rejecting negatives.
    pub const fn from_cents(cents: i64) -> Option<Self> {
        if cents < 0 { None } else { Some(Self(cents)) }
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parse an optional form value; blank or absent means zero.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, MoneyParseError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::ZERO),
            Some(value) => value.parse(),
        }
    }

    /// Saturating sum, for dashboard totals.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() && frac.is_empty() {
            return Err(MoneyParseError);
        }
        if !all_digits(whole) || !all_digits(frac) || frac.len() > 2 {
            return Err(MoneyParseError);
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| MoneyParseError)?
        };
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| MoneyParseError)? * 10,
            _ => frac.parse().map_err(|_| MoneyParseError)?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac_cents))
            .map(Self)
            .ok_or(MoneyParseError)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
