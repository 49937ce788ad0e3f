//! Terminal market dashboard.
//!
//! Polls a quote source on a fixed period and redraws the snapshot in the
//! terminal, either as a table or as a grid of cards. The source is the
//! provider itself (through the shared `MarketData` service and its cache) or,
//! with `--server`, a running dashboard server.
//!
//! Usage example (CLI):
//! ```bash
//! market_client --view cards --interval-secs 30
//! market_client --server localhost:8080 --once
//! ```
#![warn(missing_docs)]
mod args;
mod render;
mod source;

use crate::args::{Args, View};
use crate::render::{CardRenderer, TerminalRenderer};
use crate::source::{QuoteSource, RemoteDashboard};
use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info};
use market_common::quote::local_now;
use market_common::render::Renderer;
use market_common::scheduler::RefreshScheduler;
use market_common::{MarketError, Result};
use std::io;

fn main() -> Result<(), MarketError> {
    init_logger();
    let args = Args::parse();
    let config = args.market.to_config()?;

    let source = match &args.server {
        Some(server) => QuoteSource::Remote(RemoteDashboard::new(server, config.provider_timeout)?),
        None => QuoteSource::Local(args.market.build_service(&config)?),
    };
    info!("Reading quotes from {}", source.describe());

    let color = !args.no_color;
    let clear_screen = !args.once;
    let mut renderer: Box<dyn Renderer + Send> = match args.view {
        View::Terminal => Box::new(TerminalRenderer::new(
            io::stdout(),
            color,
            clear_screen,
            config.refresh_interval,
        )),
        View::Cards => Box::new(CardRenderer::new(io::stdout(), color, clear_screen)),
    };

    if args.once {
        return draw(&source, renderer.as_mut());
    }

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| MarketError::Task(format!("Error setting Ctrl+C handler: {e}")))?;

    let refresher = RefreshScheduler::start("dashboard", config.refresh_interval, move || {
        if let Err(e) = draw(&source, renderer.as_mut()) {
            error!("Refresh failed, keeping the previous frame: {}", e);
        }
    })?;

    let _ = shutdown_rx.recv();
    refresher.stop();
    info!("Dashboard closed");
    Ok(())
}

fn draw(source: &QuoteSource, renderer: &mut dyn Renderer) -> Result<()> {
    let snapshot = source.next_snapshot()?;
    renderer.render(&snapshot, local_now())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
