//! Yahoo Finance chart endpoint provider.
//!
//! Both quotes and history come from `/v8/finance/chart/{symbol}`. Quotes read the
//! `meta` block (`regularMarketPrice`, `regularMarketVolume`, `chartPreviousClose`);
//! history zips `timestamp` with `indicators.quote[0]`, whose entries are nullable.

use chrono::DateTime;
use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::ProviderError;
use crate::history::{Bar, HistoryRange};
use crate::provider::{MarketProvider, ProviderQuote};
use crate::Result;

/// Public Yahoo Finance query host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) market_dashboard/0.1";

/// Blocking Yahoo Finance client with a per-request timeout.
///
/// Build it outside of any async runtime; the blocking client owns its own.
pub struct YahooProvider {
    client: Client,
    base_url: Url,
}

impl YahooProvider {
    /// Provider against the public endpoint.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Provider against a custom host (proxy, mirror, local fixture server).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::from)?;
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::Malformed(format!("base url '{base_url}': {e}")))?;
        Ok(YahooProvider { client, base_url })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Malformed("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    fn chart(&self, symbol: &str, query: &[(&str, String)]) -> Result<ChartResult, ProviderError> {
        let url = self.chart_url(symbol)?;
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ProviderError::Status(429));
        }
        let body = response.text()?;
        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ProviderError::Malformed(e.to_string())),
            Err(_) => return Err(ProviderError::Status(status.as_u16())),
        };
        first_result(symbol, envelope)
    }
}

impl MarketProvider for YahooProvider {
    fn quote(&self, symbol: &str) -> Result<ProviderQuote, ProviderError> {
        let result = self.chart(
            symbol,
            &[("range", "1d".to_string()), ("interval", "1d".to_string())],
        )?;
        Ok(quote_from_meta(&result.meta))
    }

    fn history(&self, symbol: &str, range: &HistoryRange) -> Result<Vec<Bar>, ProviderError> {
        let result = self.chart(
            symbol,
            &[
                ("period1", range.start_timestamp().to_string()),
                ("period2", range.end_timestamp().to_string()),
                ("interval", range.interval.to_string()),
                ("events", "history".to_string()),
            ],
        )?;
        bars_from_result(&result)
    }
}

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    regular_market_volume: Option<u64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteIndicator>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct QuoteIndicator {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

fn first_result(symbol: &str, envelope: ChartEnvelope) -> Result<ChartResult, ProviderError> {
    if let Some(error) = envelope.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("Not Found") {
            ProviderError::NoData(symbol.to_string())
        } else {
            ProviderError::Malformed(format!("{}: {}", error.code, error.description))
        });
    }
    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ProviderError::NoData(symbol.to_string()))
}

fn quote_from_meta(meta: &ChartMeta) -> ProviderQuote {
    let previous = meta.chart_previous_close.or(meta.previous_close);
    let change_percent = match (meta.regular_market_price, previous) {
        (Some(price), Some(prev)) if prev != 0.0 => Some((price - prev) / prev * 100.0),
        _ => None,
    };
    ProviderQuote {
        price: meta.regular_market_price,
        change_percent,
        volume: meta.regular_market_volume,
    }
}

fn bars_from_result(result: &ChartResult) -> Result<Vec<Bar>, ProviderError> {
    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            let timestamp = DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| ProviderError::Malformed(format!("timestamp {ts} out of range")))?;
            Ok(Bar {
                timestamp,
                open: value_at(&quote.open, i),
                high: value_at(&quote.high, i),
                low: value_at(&quote.low, i),
                close: value_at(&quote.close, i),
                volume: value_at(&quote.volume, i),
            })
        })
        .collect()
}

fn value_at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}
