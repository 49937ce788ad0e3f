use chrono::{Days, NaiveDate};
use market_common::cache::{CacheStore, FileBackend, MemoryBackend, StorageBackend};
use market_common::history::{Bar, HistoricalRequest, HistoryRange, Interval, SymbolSelection};
use market_common::markets::Market;
use market_common::provider::{MarketProvider, ProviderQuote};
use market_common::{FallbackPolicy, MarketConfig, MarketData, MarketError, ProviderError, QuoteSnapshot};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider serving one bar per calendar day of the range and fixed quotes,
/// except for the symbols listed in `failing`.
#[derive(Default)]
struct StubProvider {
    failing: HashSet<String>,
    empty: HashSet<String>,
    quote_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl StubProvider {
    fn failing(symbols: &[&str]) -> Self {
        StubProvider {
            failing: symbols.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl MarketProvider for StubProvider {
    fn quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(symbol) {
            return Err(ProviderError::Transport("connection refused".to_string()));
        }
        Ok(ProviderQuote {
            price: Some(101.5),
            change_percent: Some(0.75),
            volume: Some(5_000),
        })
    }

    fn history(&self, symbol: &str, range: &HistoryRange) -> Result<Vec<Bar>, ProviderError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(symbol) {
            return Err(ProviderError::Status(500));
        }
        if self.empty.contains(symbol) {
            return Ok(Vec::new());
        }
        let mut bars = Vec::new();
        let mut day = range.start;
        let mut price = 10.0;
        while day < range.end {
            bars.push(Bar {
                timestamp: day.and_hms_opt(14, 30, 0).unwrap().and_utc(),
                open: Some(price),
                high: Some(price + 1.0),
                low: Some(price - 1.0),
                close: Some(price + 0.5),
                volume: Some(1_000),
            });
            price += 1.0;
            day = day.checked_add_days(Days::new(1)).unwrap();
        }
        // newest first, as a careless upstream might send them
        bars.reverse();
        Ok(bars)
    }
}

fn service(provider: &Arc<StubProvider>, store: CacheStore) -> MarketData {
    service_with(provider, store, FallbackPolicy::Batch)
}

fn service_with(provider: &Arc<StubProvider>, store: CacheStore, fallback: FallbackPolicy) -> MarketData {
    let config = MarketConfig {
        fallback,
        ..MarketConfig::default()
    };
    MarketData::new(Arc::clone(provider) as Arc<dyn MarketProvider>, store, &config)
}

fn scratch_cache(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("market_data_it_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stock_data.json");
    let _ = std::fs::remove_file(&path);
    path
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(symbols: &[&str], start: NaiveDate, end: NaiveDate) -> HistoricalRequest {
    HistoricalRequest {
        selection: SymbolSelection::Explicit(symbols.iter().map(|s| s.to_string()).collect()),
        range: HistoryRange::new(start, end, Interval::OneDay).unwrap(),
    }
}

#[test]
fn fetch_quotes_populates_every_configured_symbol() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());

    let snapshot = data.fetch_quotes();
    assert_eq!(snapshot.len(), 4);
    for (symbol, quote) in &snapshot {
        assert_eq!(quote.price, 101.5, "{symbol}");
        assert_eq!(quote.change, 0.75, "{symbol}");
        assert_eq!(quote.volume, 5_000, "{symbol}");
    }
}

#[test]
fn provider_failure_yields_synthetic_snapshot() {
    let provider = Arc::new(StubProvider::failing(&["GOOGL"]));
    let data = service(&provider, CacheStore::memory());

    let snapshot = data.fetch_quotes();
    assert_eq!(
        snapshot.symbols().collect::<Vec<_>>(),
        vec!["AAPL", "GOOGL", "MSFT", "TSLA"]
    );
    for (_, quote) in &snapshot {
        assert!((-3.0..3.0).contains(&quote.change));
    }
    assert_eq!(snapshot.get("MSFT").unwrap().price, 378.85);
    assert_eq!(snapshot.get("MSFT").unwrap().volume, 34_567_890);
}

#[test]
fn per_symbol_fallback_only_replaces_failures() {
    let provider = Arc::new(StubProvider::failing(&["GOOGL"]));
    let data = service_with(&provider, CacheStore::memory(), FallbackPolicy::PerSymbol);

    let snapshot = data.fetch_quotes();
    assert_eq!(snapshot.get("AAPL").unwrap().price, 101.5);
    assert_eq!(snapshot.get("GOOGL").unwrap().price, 2847.32);
}

#[test]
fn repeated_symbols_with_per_symbol_fallback_still_refresh() {
    log::set_max_level(log::LevelFilter::Info);
    let provider = Arc::new(StubProvider::failing(&["AAPL"]));
    let config = MarketConfig {
        symbols: vec!["AAPL".to_string(), "AAPL".to_string()],
        fallback: FallbackPolicy::PerSymbol,
        ..MarketConfig::default()
    };
    let data = MarketData::new(Arc::clone(&provider) as Arc<dyn MarketProvider>, CacheStore::memory(), &config);

    let snapshot = data.fetch_quotes();
    assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["AAPL"]);
    assert_eq!(snapshot.get("AAPL").unwrap().price, 175.43);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn load_without_cache_fetches_once_and_creates_file() {
    let path = scratch_cache("load_missing");
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::file(&path));

    let snapshot = data.load();
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 4);

    let on_disk = FileBackend::new(&path).read().unwrap().expect("cache file written");
    assert_eq!(QuoteSnapshot::from_json_slice(&on_disk).unwrap(), snapshot);
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn load_with_cache_does_not_touch_provider() {
    let provider = Arc::new(StubProvider::default());
    let first = service(&provider, CacheStore::memory()).fetch_quotes();

    let seeded = MemoryBackend::with_bytes(first.to_json_bytes().unwrap());
    let counting = Arc::new(StubProvider::default());
    let data = service(&counting, CacheStore::new(seeded));

    assert_eq!(data.load(), first);
    assert_eq!(counting.quote_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn save_then_load_round_trips() {
    let path = scratch_cache("round_trip");
    let provider = Arc::new(StubProvider::failing(&["AAPL"]));
    let data = service(&provider, CacheStore::file(&path));

    let snapshot = service(&provider, CacheStore::memory()).fetch_quotes();
    data.save(&snapshot).unwrap();
    let calls_before = provider.quote_calls.load(Ordering::SeqCst);

    assert_eq!(data.load(), snapshot);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), calls_before);
    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[test]
fn corrupt_cache_is_refetched() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::new(MemoryBackend::with_bytes("not json")));

    let snapshot = data.load();
    assert_eq!(snapshot.len(), 4);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 4);
    assert_eq!(data.load(), snapshot);
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 4);
}

#[test]
fn every_fetch_replaces_the_cached_snapshot() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());

    let offline = service(&Arc::new(StubProvider::failing(&["AAPL"])), CacheStore::memory());
    data.save(&offline.fetch_quotes()).unwrap();
    assert_eq!(data.load().get("AAPL").unwrap().price, 175.43);

    let fresh = data.fetch_quotes();
    assert_eq!(data.load(), fresh);
    assert_eq!(data.load().get("AAPL").unwrap().price, 101.5);
}

#[test]
fn historical_series_are_aligned_and_ascending() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());

    let result = data
        .fetch_historical(&request(&["AAPL"], day(2024, 1, 1), day(2024, 1, 10)))
        .unwrap();

    let series = result.get("AAPL").expect("AAPL present");
    assert_eq!(series.len(), 9);
    for len in [series.open.len(), series.high.len(), series.low.len(), series.close.len(), series.volume.len()] {
        assert_eq!(len, series.dates.len());
    }
    assert!(series.dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(series.dates.first().unwrap(), "2024-01-01");
    assert_eq!(series.dates.last().unwrap(), "2024-01-09");
}

#[test]
fn failing_symbols_are_skipped() {
    let provider = Arc::new(StubProvider::failing(&["BROKEN"]));
    let data = service(&provider, CacheStore::memory());

    let result = data
        .fetch_historical(&request(&["BROKEN", "AAPL"], day(2024, 1, 1), day(2024, 1, 5)))
        .unwrap();
    assert_eq!(result.keys().collect::<Vec<_>>(), vec!["AAPL"]);
    assert_eq!(provider.history_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn symbols_without_bars_are_absent() {
    let provider = Arc::new(StubProvider {
        empty: ["MSFT".to_string()].into_iter().collect(),
        ..Default::default()
    });
    let data = service(&provider, CacheStore::memory());

    let result = data
        .fetch_historical(&request(&["MSFT", "TSLA"], day(2024, 1, 1), day(2024, 1, 3)))
        .unwrap();
    assert!(!result.contains_key("MSFT"));
    assert!(result.contains_key("TSLA"));
}

#[test]
fn unknown_market_queries_stock_symbols() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());

    let request = HistoricalRequest::from_params(
        None,
        Some("unknown"),
        Some("2024-01-01"),
        Some("2024-01-03"),
        None,
        day(2024, 2, 1),
    )
    .unwrap();
    let result = data.fetch_historical(&request).unwrap();
    assert_eq!(
        result.keys().cloned().collect::<Vec<_>>(),
        {
            let mut expected = Market::Stocks.symbol_list();
            expected.sort();
            expected
        }
    );
}

#[test]
fn empty_selection_is_a_request_error() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());

    let err = data
        .fetch_historical(&request(&[], day(2024, 1, 1), day(2024, 1, 3)))
        .unwrap_err();
    assert!(matches!(err, MarketError::InvalidRequest(_)));
}

#[test]
fn markets_are_listed_in_catalog_order() {
    let provider = Arc::new(StubProvider::default());
    let data = service(&provider, CacheStore::memory());
    assert_eq!(data.markets(), vec!["stocks", "crypto", "forex", "commodities"]);
}
