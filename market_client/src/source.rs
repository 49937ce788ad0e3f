//! Where the client gets its snapshots from.
//!
//! Either the local `MarketData` service (provider + cache in this process) or
//! a running dashboard server, asked over HTTP for a fresh snapshot each poll.
use log::debug;
use market_common::error::ProviderError;
use market_common::{MarketData, QuoteSnapshot, Result};
use std::time::Duration;

/// Path that makes the server fetch and return a fresh snapshot.
const REFRESH_PATH: &str = "/api/refresh";

/// Snapshot source driven by the refresh loop.
pub enum QuoteSource {
    /// Fetch in-process; every poll goes to the provider and rewrites the cache.
    Local(MarketData),
    /// Ask a dashboard server.
    Remote(RemoteDashboard),
}

impl QuoteSource {
    /// Produce the snapshot for the next frame.
    pub fn next_snapshot(&self) -> Result<QuoteSnapshot> {
        match self {
            QuoteSource::Local(data) => Ok(data.fetch_quotes()),
            QuoteSource::Remote(remote) => remote.refresh(),
        }
    }

    /// Where snapshots come from, for the startup log line.
    pub fn describe(&self) -> String {
        match self {
            QuoteSource::Local(data) => format!("local provider for {:?}", data.symbols()),
            QuoteSource::Remote(remote) => format!("server at {}", remote.base),
        }
    }
}

/// Blocking HTTP client for a dashboard server.
pub struct RemoteDashboard {
    client: reqwest::blocking::Client,
    base: String,
}

impl RemoteDashboard {
    /// Client for the server at `base`; each request is bounded by `timeout`.
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::from)?;
        Ok(RemoteDashboard {
            client,
            base: normalize_base(base),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Fetch a fresh snapshot through the server.
    pub fn refresh(&self) -> Result<QuoteSnapshot> {
        let url = self.endpoint(REFRESH_PATH);
        debug!("GET {}", url);
        let snapshot = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<QuoteSnapshot>())
            .map_err(ProviderError::from)?;
        Ok(snapshot)
    }
}

/// Trim whitespace, quotes and trailing slashes; default to `http://`.
fn normalize_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('"').trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
