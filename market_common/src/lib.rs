//!
//! Common types and the shared data-access layer of the market dashboard.
//!
//! This crate aggregates:
//! - `error`: unified error type `MarketError` and the provider's `ProviderError`.
//! - `result`: handy `Result<T, MarketError>` alias.
//! - `markets`: market categories, their default symbols, symbol-list parsing.
//! - `quote`: `Quote` / `QuoteSnapshot`, the cached current quotes.
//! - `history`: historical OHLCV series and query parameters.
//! - `provider` / `yahoo`: the market-data provider seam and its live implementation.
//! - `synthetic`: placeholder quotes used when the provider is unavailable.
//! - `fetcher`: live quote fetching with synthetic fallback.
//! - `cache`: the single-snapshot cache and its storage backends.
//! - `service`: `MarketData`, the fetch/cache/query module every front end uses.
//! - `scheduler`: recurring refresh task with cancellation.
//! - `render`: presentation seam and formatting helpers.
//! - `config` / `net`: runtime settings and networking constants.
#![warn(missing_docs)]
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod history;
pub mod markets;
pub mod net;
pub mod provider;
pub mod quote;
pub mod render;
pub mod result;
pub mod scheduler;
pub mod service;
pub mod synthetic;
pub mod yahoo;

pub use config::{FallbackPolicy, MarketConfig};
pub use error::{MarketError, ProviderError};
pub use quote::{Quote, QuoteSnapshot};
pub use result::Result;
pub use service::MarketData;
