//! Historical OHLCV series and the parameters of a historical query.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

use crate::error::MarketError;
use crate::markets::{Market, split_symbols};
use crate::Result;

/// Default look-back window of a historical query.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Bar interval understood by the provider.
#[derive(Debug, Clone, Copy, Display, EnumString, Eq, PartialEq, Hash, Default)]
#[allow(missing_docs)]
pub enum Interval {
    #[strum(serialize = "1m")]
    OneMinute,
    #[strum(serialize = "2m")]
    TwoMinutes,
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "60m")]
    SixtyMinutes,
    #[strum(serialize = "90m")]
    NinetyMinutes,
    #[strum(serialize = "1h")]
    OneHour,
    #[default]
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "5d")]
    FiveDays,
    #[strum(serialize = "1wk")]
    OneWeek,
    #[strum(serialize = "1mo")]
    OneMonth,
    #[strum(serialize = "3mo")]
    ThreeMonths,
}

impl Interval {
    /// Intervals shorter than a day.
    pub fn is_intraday(self) -> bool {
        matches!(
            self,
            Interval::OneMinute
                | Interval::TwoMinutes
                | Interval::FiveMinutes
                | Interval::FifteenMinutes
                | Interval::ThirtyMinutes
                | Interval::SixtyMinutes
                | Interval::NinetyMinutes
                | Interval::OneHour
        )
    }

    /// Label a bar timestamp; intraday bars keep the time of day so labels stay unique.
    pub fn label(self, timestamp: DateTime<Utc>) -> String {
        if self.is_intraday() {
            timestamp.format("%Y-%m-%d %H:%M").to_string()
        } else {
            timestamp.format("%Y-%m-%d").to_string()
        }
    }

    /// Parse an interval name, rejecting anything the provider does not know.
    pub fn parse_name(raw: &str) -> Result<Interval> {
        raw.trim()
            .parse()
            .map_err(|_| MarketError::InvalidRequest(format!("unsupported interval '{raw}'")))
    }
}

/// Half-open date range `[start, end)` plus bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRange {
    /// First day, included from midnight UTC.
    pub start: NaiveDate,
    /// Last day, excluded from midnight UTC.
    pub end: NaiveDate,
    /// Bar size.
    pub interval: Interval,
}

impl HistoryRange {
    /// Validate and build a range.
    pub fn new(start: NaiveDate, end: NaiveDate, interval: Interval) -> Result<Self> {
        if start > end {
            return Err(MarketError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(HistoryRange {
            start,
            end,
            interval,
        })
    }

    /// The last [`DEFAULT_LOOKBACK_DAYS`] days ending `today`, daily bars.
    pub fn default_ending(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);
        HistoryRange {
            start,
            end: today,
            interval: Interval::default(),
        }
    }

    /// Start of the range as unix seconds (midnight UTC).
    pub fn start_timestamp(&self) -> i64 {
        midnight_utc(self.start)
    }

    /// End of the range as unix seconds (midnight UTC, exclusive).
    pub fn end_timestamp(&self) -> i64 {
        midnight_utc(self.end)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Parse a `YYYY-MM-DD` query date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| MarketError::InvalidRequest(format!("invalid date '{raw}': {e}")))
}

/// One provider bar; any field may be missing in the upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Bar open time.
    pub timestamp: DateTime<Utc>,
    /// Opening price.
    pub open: Option<f64>,
    /// Highest price.
    pub high: Option<f64>,
    /// Lowest price.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Traded volume.
    pub volume: Option<u64>,
}

/// Index-aligned OHLCV arrays for one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    /// Bar labels, strictly ascending (see [`Interval::label`]).
    pub dates: Vec<String>,
    /// Opening prices.
    pub open: Vec<f64>,
    /// Highest prices.
    pub high: Vec<f64>,
    /// Lowest prices.
    pub low: Vec<f64>,
    /// Closing prices.
    pub close: Vec<f64>,
    /// Volumes; missing upstream values are 0.
    pub volume: Vec<u64>,
}

impl HistoricalSeries {
    /// Build a series from provider bars.
    ///
    /// Bars are ordered by timestamp; incomplete bars and bars whose label repeats
    /// the previous one are dropped, so every array has the same length and
    /// `dates` is strictly ascending.
    pub fn from_bars(mut bars: Vec<Bar>, interval: Interval) -> Self {
        bars.sort_by_key(|bar| bar.timestamp);
        let mut series = HistoricalSeries::default();

        for bar in bars {
            let (Some(open), Some(high), Some(low), Some(close)) =
                (bar.open, bar.high, bar.low, bar.close)
            else {
                continue;
            };
            let label = interval.label(bar.timestamp);
            if series.dates.last() == Some(&label) {
                continue;
            }
            series.dates.push(label);
            series.open.push(open);
            series.high.push(high);
            series.low.push(low);
            series.close.push(close);
            series.volume.push(bar.volume.unwrap_or(0));
        }
        series
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no bars.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Result of a historical query: symbol to series, symbols without data absent.
pub type HistoricalData = BTreeMap<String, HistoricalSeries>;

/// Which symbols a historical query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSelection {
    /// An explicit, ordered list of symbols.
    Explicit(Vec<String>),
    /// The default list of a market category.
    Market(Market),
}

impl SymbolSelection {
    /// Build a selection from the raw `symbols` / `market` query parameters.
    ///
    /// A non-empty symbol list wins; otherwise the category is used, with unknown
    /// or missing categories resolving to `stocks`.
    pub fn from_params(symbols: Option<&str>, market: Option<&str>) -> Self {
        let explicit = symbols.map(split_symbols).unwrap_or_default();
        if !explicit.is_empty() {
            return SymbolSelection::Explicit(explicit);
        }
        SymbolSelection::Market(market.map(Market::resolve).unwrap_or_default())
    }

    /// The ordered list of symbols to query.
    pub fn resolve(&self) -> Vec<String> {
        match self {
            SymbolSelection::Explicit(symbols) => symbols.clone(),
            SymbolSelection::Market(market) => market.symbol_list(),
        }
    }
}

/// Fully-resolved historical query.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRequest {
    /// Symbols to query.
    pub selection: SymbolSelection,
    /// Date range and interval shared by every symbol.
    pub range: HistoryRange,
}

impl HistoricalRequest {
    /// Build a request from raw query parameters, applying defaults relative to `today`.
    pub fn from_params(
        symbols: Option<&str>,
        market: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        interval: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self> {
        let defaults = HistoryRange::default_ending(today);
        let start = start.map(parse_date).transpose()?.unwrap_or(defaults.start);
        let end = end.map(parse_date).transpose()?.unwrap_or(defaults.end);
        let interval = interval
            .map(Interval::parse_name)
            .transpose()?
            .unwrap_or(defaults.interval);

        Ok(HistoricalRequest {
            selection: SymbolSelection::from_params(symbols, market),
            range: HistoryRange::new(start, end, interval)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(ts: i64, close: Option<f64>) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            open: Some(1.0),
            high: Some(2.0),
            low: Some(0.5),
            close,
            volume: Some(10),
        }
    }

    #[test]
    fn interval_names_round_trip() {
        assert_eq!(Interval::parse_name("1wk").unwrap(), Interval::OneWeek);
        assert_eq!(Interval::OneHour.to_string(), "1h");
        assert!(Interval::parse_name("7d").is_err());
    }

    #[test]
    fn series_drops_incomplete_bars_and_sorts() {
        let bars = vec![
            bar(1_704_326_400, Some(3.0)), // 2024-01-04
            bar(1_704_153_600, Some(1.0)), // 2024-01-02
            bar(1_704_240_000, None),      // 2024-01-03
        ];
        let series = HistoricalSeries::from_bars(bars, Interval::OneDay);
        assert_eq!(series.dates, vec!["2024-01-02", "2024-01-04"]);
        assert_eq!(series.close, vec![1.0, 3.0]);
        assert_eq!(series.open.len(), 2);
        assert_eq!(series.volume.len(), 2);
    }

    #[test]
    fn intraday_labels_keep_time_of_day() {
        let bars = vec![bar(1_704_186_000, Some(1.0)), bar(1_704_189_600, Some(2.0))];
        let series = HistoricalSeries::from_bars(bars.clone(), Interval::OneHour);
        assert_eq!(series.dates, vec!["2024-01-02 09:00", "2024-01-02 10:00"]);

        let daily = HistoricalSeries::from_bars(bars, Interval::OneDay);
        assert_eq!(daily.len(), 1);
    }

    #[test]
    fn request_defaults_to_thirty_days_of_daily_stocks() {
        let request =
            HistoricalRequest::from_params(None, None, None, None, None, day(2024, 3, 31)).unwrap();
        assert_eq!(request.range.start, day(2024, 3, 1));
        assert_eq!(request.range.end, day(2024, 3, 31));
        assert_eq!(request.range.interval, Interval::OneDay);
        assert_eq!(request.selection, SymbolSelection::Market(Market::Stocks));
    }

    #[test]
    fn explicit_symbols_override_market() {
        let selection = SymbolSelection::from_params(Some("AAPL, BTC-USD"), Some("forex"));
        assert_eq!(selection.resolve(), vec!["AAPL", "BTC-USD"]);

        let blank = SymbolSelection::from_params(Some(" , "), Some("forex"));
        assert_eq!(blank, SymbolSelection::Market(Market::Forex));
    }

    #[test]
    fn unknown_market_falls_back_to_stocks() {
        let selection = SymbolSelection::from_params(None, Some("unknown"));
        assert_eq!(selection.resolve(), Market::Stocks.symbol_list());
    }

    #[test]
    fn rejects_inverted_ranges_and_bad_dates() {
        let today = day(2024, 3, 31);
        let inverted = HistoricalRequest::from_params(
            None,
            None,
            Some("2024-02-01"),
            Some("2024-01-01"),
            None,
            today,
        );
        assert!(matches!(inverted, Err(MarketError::InvalidRequest(_))));

        let garbage = HistoricalRequest::from_params(None, None, Some("01/02/2024"), None, None, today);
        assert!(matches!(garbage, Err(MarketError::InvalidRequest(_))));
    }

    #[test]
    fn range_timestamps_are_midnight_utc() {
        let range = HistoryRange::new(day(2024, 1, 1), day(2024, 1, 10), Interval::OneDay).unwrap();
        assert_eq!(range.start_timestamp(), 1_704_067_200);
        assert_eq!(range.end_timestamp(), 1_704_844_800);
    }
}
