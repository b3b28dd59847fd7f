//! Precision-safe price type.
//!
//! Uses `rust_decimal` so that the value written to disk is exactly the
//! value the upstream sent, without a round-trip through `f64` formatting.

use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Token price with exact decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Parse a price from a raw JSON value.
    ///
    /// The price endpoint has shipped prices both as JSON numbers and as
    /// numeric strings, so both are accepted. Numbers are parsed from their
    /// textual form, never through `f64`.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Self::from_str(s),
            Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Self)
                    .map_err(CoreError::DecimalParse)
            }
            other => Err(CoreError::InvalidPrice(format!(
                "expected number or string, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Self)
            .map_err(CoreError::DecimalParse)
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
