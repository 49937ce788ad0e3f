//! Market-data provider seam.
//!
//! The fetch and historical paths only talk to a `MarketProvider`; the live Yahoo
//! implementation lives in [`crate::yahoo`], tests plug in their own.

use std::sync::Arc;

use crate::error::ProviderError;
use crate::history::{Bar, HistoryRange};

/// Raw live quote as reported upstream; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderQuote {
    /// Last traded price.
    pub price: Option<f64>,
    /// Percent change against the previous close.
    pub change_percent: Option<f64>,
    /// Traded volume of the session.
    pub volume: Option<u64>,
}

/// Source of live quotes and historical bars.
pub trait MarketProvider: Send + Sync {
    /// Current quote for `symbol`.
    fn quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError>;

    /// Bars for `symbol` over `range`. An empty vector means "no data".
    fn history(&self, symbol: &str, range: &HistoryRange) -> Result<Vec<Bar>, ProviderError>;
}

impl<P: MarketProvider + ?Sized> MarketProvider for Arc<P> {
    fn quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
        (**self).quote(symbol)
    }

    fn history(&self, symbol: &str, range: &HistoryRange) -> Result<Vec<Bar>, ProviderError> {
        (**self).history(symbol, range)
    }
}

/// Provider that is never reachable; every call fails with a transport error.
///
/// Used for offline runs where the synthetic fallback is the desired data source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl MarketProvider for OfflineProvider {
    fn quote(&self, _symbol: &str) -> Result<ProviderQuote, ProviderError> {
        Err(ProviderError::Transport("offline mode".to_string()))
    }

    fn history(&self, _symbol: &str, _range: &HistoryRange) -> Result<Vec<Bar>, ProviderError> {
        Err(ProviderError::Transport("offline mode".to_string()))
    }
}
