//! Price data structures shared by the fetcher and the persister.

use crate::token::TokenId;
use crate::Price;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One token's price at one point in time.
///
/// `raw` is the upstream object exactly as received, including whatever
/// extra info the endpoint attached. It is passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Parsed price. `None` when the upstream record has no usable price.
    pub price: Option<Price>,
    /// Raw upstream record.
    pub raw: Value,
}

impl PriceRecord {
    /// Build a record from the raw upstream object.
    pub fn from_raw(raw: Value) -> Self {
        let price = raw.get("price").and_then(|v| Price::from_json(v).ok());
        Self { price, raw }
    }
}

/// Prices returned by one fetch, keyed by token.
///
/// Keeps upstream order for iteration; lookups go through an index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    entries: Vec<(TokenId, PriceRecord)>,
    index: HashMap<TokenId, usize>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for a token.
    pub fn insert(&mut self, token: TokenId, record: PriceRecord) {
        match self.index.get(&token) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(token.clone(), self.entries.len());
                self.entries.push((token, record));
            }
        }
    }

    pub fn get(&self, token: &TokenId) -> Option<&PriceRecord> {
        self.index.get(token).map(|&i| &self.entries[i].1)
    }

    /// Price for a token, if present and parseable.
    pub fn price_of(&self, token: &TokenId) -> Option<Price> {
        self.get(token).and_then(|r| r.price)
    }

    pub fn contains(&self, token: &TokenId) -> bool {
        self.index.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TokenId, &PriceRecord)> {
        self.entries.iter().map(|(t, r)| (t, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// UTC instant shared by every row written in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleTimestamp(DateTime<Utc>);

impl CycleTimestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 with microseconds and a `Z` suffix.
    pub fn to_iso_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl From<DateTime<Utc>> for CycleTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for CycleTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso_string())
    }
}
