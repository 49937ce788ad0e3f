//! The shared data-access module every front end consumes.
//!
//! `MarketData` ties one provider, one quote fetcher and one cache store together
//! and exposes the whole refresh/cache/query cycle:
//!
//! - `fetch_quotes`: fetch (with synthetic fallback), persist, return.
//! - `load`: cached snapshot, or `fetch_quotes` when there is none.
//! - `save`: overwrite the cache.
//! - `fetch_historical`: per-symbol OHLCV query, failures skipped.

use log::{error, info, warn};
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::fetcher::QuoteFetcher;
use crate::history::{HistoricalData, HistoricalRequest, HistoricalSeries};
use crate::markets::Market;
use crate::provider::MarketProvider;
use crate::quote::QuoteSnapshot;
use crate::yahoo::YahooProvider;
use crate::Result;

/// Quote snapshot and historical series access over one provider and cache.
pub struct MarketData {
    provider: Arc<dyn MarketProvider>,
    fetcher: QuoteFetcher,
    store: CacheStore,
}

impl MarketData {
    /// Assemble the service from its parts.
    pub fn new(provider: Arc<dyn MarketProvider>, store: CacheStore, config: &MarketConfig) -> Self {
        let fetcher = QuoteFetcher::new(Arc::clone(&provider), config.symbols.clone(), config.fallback);
        MarketData {
            provider,
            fetcher,
            store,
        }
    }

    /// Live Yahoo provider and file cache, as configured.
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        let provider = YahooProvider::new(config.provider_timeout)?;
        Ok(Self::new(
            Arc::new(provider),
            CacheStore::file(&config.cache_path),
            config,
        ))
    }

    /// Fetch a fresh snapshot, overwrite the cache with it and return it.
    ///
    /// Never fails: provider errors degrade to synthetic data and a cache write
    /// failure is only logged.
    pub fn fetch_quotes(&self) -> QuoteSnapshot {
        let snapshot = self.fetcher.fetch();
        if let Err(e) = self.store.save(&snapshot) {
            error!("Failed to write cache {}: {}", self.store.describe(), e);
        }
        snapshot
    }

    /// Cached snapshot, fetching and populating the cache when none is usable.
    pub fn load(&self) -> QuoteSnapshot {
        match self.store.read() {
            Some(snapshot) => snapshot,
            None => {
                info!("No cached quotes in {}, fetching", self.store.describe());
                self.fetch_quotes()
            }
        }
    }

    /// Overwrite the cache with `snapshot`.
    pub fn save(&self, snapshot: &QuoteSnapshot) -> Result<()> {
        self.store.save(snapshot)
    }

    /// Query OHLCV bars for every selected symbol.
    ///
    /// Symbols the provider fails on, or has no bars for, are absent from the
    /// result; the call itself only fails when the request cannot be resolved.
    pub fn fetch_historical(&self, request: &HistoricalRequest) -> Result<HistoricalData> {
        let symbols = request.selection.resolve();
        if symbols.is_empty() {
            return Err(MarketError::InvalidRequest("no symbols to query".to_string()));
        }
        let range = &request.range;
        let mut data = HistoricalData::new();

        for symbol in symbols {
            match self.provider.history(&symbol, range) {
                Ok(bars) => {
                    let series = HistoricalSeries::from_bars(bars, range.interval);
                    if series.is_empty() {
                        info!("No {} bars for {} in {}..{}", range.interval, symbol, range.start, range.end);
                    } else {
                        data.insert(symbol, series);
                    }
                }
                Err(e) => warn!("Error fetching {}: {}", symbol, e),
            }
        }
        Ok(data)
    }

    /// Market category names in catalog order.
    pub fn markets(&self) -> Vec<String> {
        Market::names()
    }

    /// Symbols included in every quote snapshot.
    pub fn symbols(&self) -> &[String] {
        self.fetcher.symbols()
    }
}
