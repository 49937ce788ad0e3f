//! Market categories, their default symbols, and symbol-list parsing helpers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::MarketError;

/// Named grouping of instruments with a fixed default symbol list.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Market {
    /// US large-cap equities.
    #[default]
    Stocks,
    /// USD crypto pairs.
    Crypto,
    /// Major currency pairs.
    Forex,
    /// Front-month futures.
    Commodities,
}

impl Market {
    /// Default symbols of this category, in display order.
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            Market::Stocks => &["AAPL", "GOOGL", "MSFT", "TSLA"],
            Market::Crypto => &["BTC-USD", "ETH-USD", "BNB-USD", "SOL-USD"],
            Market::Forex => &["EURUSD=X", "GBPUSD=X", "USDJPY=X", "AUDUSD=X"],
            Market::Commodities => &["GC=F", "CL=F", "SI=F", "NG=F"],
        }
    }

    /// Resolve a category name, falling back to `stocks` for anything unknown.
    pub fn resolve(name: &str) -> Market {
        name.trim().parse().unwrap_or_default()
    }

    /// All category names in catalog order.
    pub fn names() -> Vec<String> {
        Market::iter().map(|m| m.to_string()).collect()
    }

    /// Owned copy of [`Market::symbols`].
    pub fn symbol_list(self) -> Vec<String> {
        self.symbols().iter().map(|s| s.to_string()).collect()
    }
}

/// Split a comma/whitespace separated list of symbols, dropping empty items.
pub fn split_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(|c: char| c == ',' || c.is_whitespace()).map(str::trim) {
        if !symbol.is_empty() && !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }
    symbols
}

/// Trait providing file parsing for symbol lists.
pub trait SymbolListParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, spaces, or new lines. Lines starting
    /// with `#` are comments. Returns an error if the reader fails or yields no
    /// symbols at all.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, MarketError>;
}

/// Marker type for the plain-text symbol list format.
pub struct SymbolFile;

impl SymbolListParser for SymbolFile {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>, MarketError> {
        let mut symbols = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            for symbol in split_symbols(trimmed_line) {
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
        }

        if symbols.is_empty() {
            return Err(MarketError::InvalidRequest(
                "symbol list is empty".to_string(),
            ));
        }
        Ok(symbols)
    }
}
