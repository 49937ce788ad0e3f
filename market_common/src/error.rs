//! Error types shared between the server and client front ends.
//!
//! `MarketError` unifies I/O, serialization, lock and request failures so crates can
//! propagate a single error type. Provider-side failures carry their own
//! `ProviderError` so callers can log which kind of upstream problem occurred.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum MarketError {
    /// I/O error originating from the standard library (cache files, sockets).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The market-data provider could not satisfy a request.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A caller-supplied parameter (date, interval, range) was rejected.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Background task failed to complete (panicked or was cancelled).
    #[error("Background task failed: {0}")]
    Task(String),
}

impl<T> From<PoisonError<T>> for MarketError {
    fn from(err: PoisonError<T>) -> Self {
        MarketError::MutexLock(err.to_string())
    }
}

/// Failure kinds reported by a [`crate::provider::MarketProvider`].
///
/// Every variant is treated as "data unavailable" by the fetch paths; the
/// distinction only feeds diagnostics.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request could not be sent or the connection dropped.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The round trip exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The payload could not be decoded into the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The provider knows nothing about the requested symbol.
    #[error("no data for symbol {0}")]
    NoData(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
