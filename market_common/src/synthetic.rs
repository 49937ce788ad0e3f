//! Synthetic quote generator used when the live provider is unavailable.
//!
//! Known symbols get a fixed illustrative base price and volume; everything else
//! gets [`DEFAULT_BASE_PRICE`] / [`DEFAULT_VOLUME`]. The percent change is sampled
//! uniformly from `[-3, 3)`.

use chrono::NaiveDateTime;
use rand::Rng;

use crate::quote::{Quote, QuoteSnapshot};

/// Lower bound (inclusive) of the synthetic percent change.
pub const MIN_CHANGE: f64 = -3.0;
/// Upper bound (exclusive) of the synthetic percent change.
pub const MAX_CHANGE: f64 = 3.0;
/// Base price for symbols without a fixed entry.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;
/// Volume for symbols without a fixed entry.
pub const DEFAULT_VOLUME: u64 = 1_000_000;

const BASELINES: &[(&str, f64, u64)] = &[
    ("AAPL", 175.43, 45_234_567),
    ("GOOGL", 2847.32, 23_456_789),
    ("MSFT", 378.85, 34_567_890),
    ("TSLA", 248.42, 56_789_012),
];

/// Fixed `(price, volume)` baseline for `symbol`.
pub fn baseline(symbol: &str) -> (f64, u64) {
    BASELINES
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, price, volume)| (*price, *volume))
        .unwrap_or((DEFAULT_BASE_PRICE, DEFAULT_VOLUME))
}

/// Generate one synthetic quote for `symbol` stamped with `updated`.
pub fn synthetic_quote<R: Rng>(symbol: &str, updated: NaiveDateTime, rng: &mut R) -> Quote {
    let (price, volume) = baseline(symbol);
    Quote {
        price,
        change: rng.random_range(MIN_CHANGE..MAX_CHANGE),
        volume,
        updated,
    }
}

/// Generate a full synthetic snapshot for `symbols`.
pub fn synthetic_snapshot<R: Rng>(
    symbols: &[String],
    updated: NaiveDateTime,
    rng: &mut R,
) -> QuoteSnapshot {
    symbols
        .iter()
        .map(|symbol| (symbol.clone(), synthetic_quote(symbol, updated, rng)))
        .collect()
}
