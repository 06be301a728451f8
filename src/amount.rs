// 💶 Amount - Currency value stored in minor units (cents)
// Every value is exact to 2 decimals by construction

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

// ============================================================================
// CORE TYPE
// ============================================================================

/// Amount - Importe en céntimos
///
/// Stored as a signed count of cents so arithmetic never drifts the way
/// `f64` sums do. Word phrases only ever produce non-negative amounts; a
/// negative value can only come from an explicit `-` digit literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { cents: 0 };

    /// Build from a raw cent count
    pub const fn from_cents(cents: i64) -> Self {
        Amount { cents }
    }

    /// Build from whole currency units ("euros"), `None` on overflow
    pub fn from_major(units: i64) -> Option<Self> {
        units.checked_mul(100).map(Amount::from_cents)
    }

    /// Build from a float, rounding half away from zero to the nearest cent
    ///
    /// Returns `None` for NaN, infinities and values outside the i64 cent range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Amount::from_cents(cents as i64))
    }

    /// Parse a plain digit literal: `-?\d+([.,]\d*)?`
    ///
    /// Comma and dot are both decimal separators. Extra fractional digits
    /// are rounded half-up on the third digit ("2.505" → 2.51).
    pub fn parse_literal(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (int_part, frac_part) = match body.find(|c| c == '.' || c == ',') {
            Some(pos) => (&body[..pos], &body[pos + 1..]),
            None => (body, ""),
        };

        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let whole: i64 = int_part.parse().ok()?;

        let digits: Vec<i64> = frac_part.bytes().map(|b| (b - b'0') as i64).collect();
        let tenths = digits.first().copied().unwrap_or(0);
        let hundredths = digits.get(1).copied().unwrap_or(0);
        let round_up = digits.get(2).map(|d| *d >= 5).unwrap_or(false);

        let mut cents = whole
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }

        Some(Amount::from_cents(if negative { -cents } else { cents }))
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Whole euros, truncated toward zero
    pub fn euros(&self) -> i64 {
        self.cents / 100
    }

    /// Cents part (0-99), sign dropped
    pub fn minor(&self) -> i64 {
        (self.cents % 100).abs()
    }

    /// Value in whole units when there is no fractional part
    pub fn whole_units(&self) -> Option<i64> {
        if self.cents % 100 == 0 {
            Some(self.cents / 100)
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.cents.checked_add(other.cents).map(Amount::from_cents)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.cents.checked_sub(other.cents).map(Amount::from_cents)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Amount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse_literal(s).ok_or_else(|| ParseError::Unrecognized(s.to_string()))
    }
}

// JSON carries amounts as plain numbers ({"total": 7.5}), like the web client sends them
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("amount out of range: {}", value)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
