//! Quote data model and JSON encoding helpers.
//!
//! A `Quote` is one symbol's current snapshot: last price, percent change, traded
//! volume and the local time it was fetched. A `QuoteSnapshot` maps symbols to
//! quotes and is exactly what the cache file and `/api/stocks` contain:
//!
//! ```json
//! {"AAPL": {"price": 175.43, "change": -1.2, "volume": 45234567, "updated": "2024-05-01T14:03:22.123456"}}
//! ```

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::Result;

/// Market quote for a single symbol. The symbol itself is the snapshot key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Last traded price (0 when unavailable).
    pub price: f64,
    /// Percent change (0 when unavailable).
    pub change: f64,
    /// Traded volume (0 when unavailable).
    pub volume: u64,
    /// Local fetch time, ISO-8601 without offset.
    pub updated: NaiveDateTime,
}

impl Quote {
    /// Build a quote stamped with `updated`, substituting 0 for missing fields.
    pub fn new(
        price: Option<f64>,
        change: Option<f64>,
        volume: Option<u64>,
        updated: NaiveDateTime,
    ) -> Self {
        Quote {
            price: price.unwrap_or(0.0),
            change: change.unwrap_or(0.0),
            volume: volume.unwrap_or(0),
            updated,
        }
    }

    /// Whether the percent change is non-negative.
    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

/// Current local time as stored in `Quote::updated`.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Mapping from symbol to its current quote, kept sorted by symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteSnapshot(BTreeMap<String, Quote>);

impl QuoteSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the quote for `symbol`.
    pub fn insert(&mut self, symbol: impl Into<String>, quote: Quote) {
        self.0.insert(symbol.into(), quote);
    }

    /// Quote for `symbol`, if present.
    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.0.get(symbol)
    }

    /// Number of symbols in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate `(symbol, quote)` pairs in symbol order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Quote> {
        self.0.iter()
    }

    /// Encode the snapshot to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a snapshot from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl<'a> IntoIterator for &'a QuoteSnapshot {
    type Item = (&'a String, &'a Quote);
    type IntoIter = btree_map::Iter<'a, String, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Quote)> for QuoteSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Quote)>>(iter: I) -> Self {
        QuoteSnapshot(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_micro_opt(12, 0, 0, 250)
            .unwrap()
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let quote = Quote::new(Some(10.5), None, None, at_noon());
        assert_eq!(quote.price, 10.5);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.volume, 0);
        assert!(quote.is_up());
    }

    #[test]
    fn snapshot_serializes_as_flat_symbol_map() {
        let mut snapshot = QuoteSnapshot::new();
        snapshot.insert("MSFT", Quote::new(Some(378.85), Some(-1.25), Some(100), at_noon()));

        let value: serde_json::Value =
            serde_json::from_slice(&snapshot.to_json_bytes().unwrap()).unwrap();
        let msft = &value["MSFT"];
        assert_eq!(msft["price"], 378.85);
        assert_eq!(msft["change"], -1.25);
        assert_eq!(msft["volume"], 100);
        assert_eq!(msft["updated"], "2024-05-01T12:00:00.000250");
    }

    #[test]
    fn decoding_rejects_quotes_with_missing_fields() {
        let raw = br#"{"AAPL": {"price": 1.0, "volume": 3, "updated": "2024-05-01T12:00:00"}}"#;
        assert!(QuoteSnapshot::from_json_slice(raw).is_err());
    }

    #[test]
    fn iterates_in_symbol_order() {
        let snapshot: QuoteSnapshot = ["TSLA", "AAPL", "MSFT"]
            .into_iter()
            .map(|s| (s.to_string(), Quote::new(None, None, None, at_noon())))
            .collect();
        assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["AAPL", "MSFT", "TSLA"]);
    }
}
