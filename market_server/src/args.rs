//! Command-line arguments for the dashboard web server.
use clap::Parser;
use market_common::config::MarketArgs;
use market_common::net::{BIND_HOST, WEB_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Market dashboard web server", long_about = None)]
pub struct Args {
    /// Interface to bind the HTTP listener to.
    #[clap(long, default_value = BIND_HOST)]
    pub host: String,

    /// HTTP port.
    #[clap(long, default_value_t = WEB_PORT)]
    pub port: u16,

    #[clap(flatten)]
    pub market: MarketArgs,
}
