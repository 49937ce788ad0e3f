//! Runtime configuration shared by the front ends.
//!
//! Binaries fill a `MarketConfig` from their command-line arguments; everything
//! has a default so `MarketConfig::default()` reproduces the stock behaviour.

use clap::{Args, ValueEnum};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use strum_macros::{Display, EnumString};

use crate::cache::CacheStore;
use crate::markets::{Market, SymbolFile, SymbolListParser, split_symbols};
use crate::provider::OfflineProvider;
use crate::service::MarketData;
use crate::Result;

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "stock_data.json";
/// Default bound on each provider round trip.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
/// Default period of the polling front ends.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// How a failed live quote request degrades to synthetic data.
#[derive(Debug, Clone, Copy, Default, Display, EnumString, ValueEnum, Eq, PartialEq)]
#[clap(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Any failure replaces the whole snapshot with synthetic quotes.
    #[default]
    Batch,
    /// Only the failing symbols are replaced; live quotes are kept.
    PerSymbol,
}

/// Settings of the shared market-data service.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    /// Location of the quote cache.
    pub cache_path: PathBuf,
    /// Symbols included in every quote snapshot.
    pub symbols: Vec<String>,
    /// Upper bound on each provider round trip.
    pub provider_timeout: Duration,
    /// Period of scheduled refreshes.
    pub refresh_interval: Duration,
    /// Scope of the synthetic fallback.
    pub fallback: FallbackPolicy,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            symbols: Market::Stocks.symbol_list(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Command-line options shared by every front end.
#[derive(Debug, Clone, Args)]
pub struct MarketArgs {
    /// Path of the quote cache file.
    #[clap(long, default_value = DEFAULT_CACHE_FILE)]
    pub cache: PathBuf,

    /// Comma-separated symbols to quote (defaults to the stocks market).
    #[clap(long, conflicts_with = "symbols_file")]
    pub symbols: Option<String>,

    /// Text file with symbols separated by commas, spaces, or new lines.
    #[clap(long)]
    pub symbols_file: Option<PathBuf>,

    /// Upper bound on each provider request, in seconds.
    #[clap(long, default_value_t = DEFAULT_PROVIDER_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Seconds between scheduled refreshes.
    #[clap(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    pub interval_secs: u64,

    /// Scope of the synthetic fallback when the provider fails.
    #[clap(long, value_enum, default_value_t = FallbackPolicy::Batch)]
    pub fallback: FallbackPolicy,

    /// Never contact the provider; serve synthetic quotes only.
    #[clap(long)]
    pub offline: bool,
}

impl MarketArgs {
    /// Resolve the arguments into a `MarketConfig`, reading the symbol file if given.
    pub fn to_config(&self) -> Result<MarketConfig> {
        let symbols = match (&self.symbols, &self.symbols_file) {
            (Some(raw), _) if !split_symbols(raw).is_empty() => split_symbols(raw),
            (_, Some(path)) => SymbolFile::parse_from_reader(BufReader::new(File::open(path)?))?,
            _ => Market::Stocks.symbol_list(),
        };
        Ok(MarketConfig {
            cache_path: self.cache.clone(),
            symbols,
            provider_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            refresh_interval: Duration::from_secs(self.interval_secs.max(1)),
            fallback: self.fallback,
        })
    }

    /// Build the shared service: the live provider, or the offline one with `--offline`.
    pub fn build_service(&self, config: &MarketConfig) -> Result<MarketData> {
        if self.offline {
            info!("Offline mode: quotes are synthetic");
            return Ok(MarketData::new(
                Arc::new(OfflineProvider),
                CacheStore::file(&config.cache_path),
                config,
            ));
        }
        MarketData::from_config(config)
    }
}
