//! Live quote fetching with synthetic fallback.
//!
//! `QuoteFetcher::fetch` never fails: whatever the provider does, it returns a
//! snapshot with one fully-populated quote per configured symbol. With
//! `FallbackPolicy::Batch` the first failing symbol aborts the live pass and the
//! whole snapshot is synthesized; with `FallbackPolicy::PerSymbol` only the
//! failing symbols are synthesized.

use log::{info, warn};
use std::sync::Arc;

use crate::config::FallbackPolicy;
use crate::error::ProviderError;
use crate::provider::MarketProvider;
use crate::quote::{Quote, QuoteSnapshot, local_now};
use crate::synthetic::{synthetic_quote, synthetic_snapshot};

/// Fetches the configured symbol list from a provider.
pub struct QuoteFetcher {
    provider: Arc<dyn MarketProvider>,
    symbols: Vec<String>,
    policy: FallbackPolicy,
}

impl QuoteFetcher {
    /// Fetcher for `symbols` with the given fallback scope.
    pub fn new(
        provider: Arc<dyn MarketProvider>,
        symbols: Vec<String>,
        policy: FallbackPolicy,
    ) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        QuoteFetcher {
            provider,
            symbols: unique,
            policy,
        }
    }

    /// Configured symbol list.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Configured fallback scope.
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Fetch a fresh snapshot, degrading to synthetic quotes on provider failure.
    pub fn fetch(&self) -> QuoteSnapshot {
        match self.policy {
            FallbackPolicy::Batch => self.fetch_batch(),
            FallbackPolicy::PerSymbol => self.fetch_per_symbol(),
        }
    }

    fn fetch_batch(&self) -> QuoteSnapshot {
        match self.fetch_live() {
            Ok(snapshot) => snapshot,
            Err((symbol, e)) => {
                warn!("Provider error on {}: {}. Using synthetic data for all symbols.", symbol, e);
                synthetic_snapshot(&self.symbols, local_now(), &mut rand::rng())
            }
        }
    }

    fn fetch_live(&self) -> Result<QuoteSnapshot, (String, ProviderError)> {
        let mut snapshot = QuoteSnapshot::new();
        for symbol in &self.symbols {
            let live = self
                .provider
                .quote(symbol)
                .map_err(|e| (symbol.clone(), e))?;
            snapshot.insert(
                symbol.clone(),
                Quote::new(live.price, live.change_percent, live.volume, local_now()),
            );
        }
        Ok(snapshot)
    }

    fn fetch_per_symbol(&self) -> QuoteSnapshot {
        let mut rng = rand::rng();
        let mut live_count = 0usize;
        let mut synthesized = 0usize;
        let snapshot: QuoteSnapshot = self
            .symbols
            .iter()
            .map(|symbol| {
                let quote = match self.provider.quote(symbol) {
                    Ok(live) => {
                        live_count += 1;
                        Quote::new(live.price, live.change_percent, live.volume, local_now())
                    }
                    Err(e) => {
                        warn!("Provider error on {}: {}. Using synthetic data for it.", symbol, e);
                        synthesized += 1;
                        synthetic_quote(symbol, local_now(), &mut rng)
                    }
                };
                (symbol.clone(), quote)
            })
            .collect();

        if synthesized > 0 {
            info!(
                "Fetched {} live and {} synthetic quotes",
                live_count, synthesized
            );
        }
        snapshot
    }
}
