//! Market dashboard web server.
//!
//! Serves the dashboard page and a small JSON API over the shared `MarketData`
//! service:
//!
//! - `GET /`: dashboard page.
//! - `GET /api/stocks`: cached quote snapshot (fetched on first use).
//! - `GET /api/refresh`: fresh fetch, cache overwritten.
//! - `GET /api/historical`: OHLCV series per symbol.
//! - `GET /api/markets`: market category names.
//!
//! The provider client is blocking, so `MarketData` is built before the tokio
//! runtime starts and every call into it runs on the blocking pool. The process
//! stops gracefully on Ctrl+C.
#![warn(missing_docs)]
mod args;
mod routes;

use crate::args::Args;
use clap::Parser;
use log::info;
use market_common::net::addr;
use market_common::{MarketData, MarketError, Result};
use std::sync::Arc;
use tokio::net::TcpListener;

fn main() -> Result<(), MarketError> {
    init_logger();
    let args = Args::parse();
    let config = args.market.to_config()?;
    info!(
        "Quoting {:?} with {} fallback, cache at {}",
        config.symbols,
        config.fallback,
        config.cache_path.display()
    );

    let data = Arc::new(args.market.build_service(&config)?);
    let bind_address = addr(&args.host, args.port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let served = runtime.block_on(serve(&bind_address, Arc::clone(&data)));
    drop(runtime);
    drop(data);
    served
}

async fn serve(bind_address: &str, data: Arc<MarketData>) -> Result<(), MarketError> {
    let listener = TcpListener::bind(bind_address).await?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, routes::router(data))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl+C received. Shutting down server...");
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
