//! Command-line arguments for the terminal dashboard.
use clap::{Parser, ValueEnum};
use market_common::config::MarketArgs;

/// Layout used to draw each snapshot.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Eq, PartialEq)]
pub enum View {
    /// One table row per symbol.
    #[default]
    Terminal,
    /// Grid of cards, two per row.
    Cards,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Terminal market dashboard", long_about = None)]
pub struct Args {
    /// Layout of the dashboard.
    #[clap(long, value_enum, default_value_t = View::Terminal)]
    pub view: View,

    /// Read snapshots from a dashboard server (e.g. `localhost:8080`) instead of the provider.
    #[clap(long)]
    pub server: Option<String>,

    /// Draw a single frame and exit.
    #[clap(long)]
    pub once: bool,

    /// Disable coloured output.
    #[clap(long)]
    pub no_color: bool,

    /// Options of the shared market-data service.
    #[clap(flatten)]
    pub market: MarketArgs,
}
