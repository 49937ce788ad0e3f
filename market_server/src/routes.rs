//! HTTP routes of the dashboard.
//!
//! Handlers are thin: they hop onto the blocking pool, call `MarketData`, and
//! encode the result as JSON. Only the historical endpoint can answer with an
//! error body (`{"error": "..."}`): 400 for rejected parameters, 500 otherwise.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use log::error;
use market_common::history::{HistoricalData, HistoricalRequest};
use market_common::{MarketData, MarketError, QuoteSnapshot};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const DASHBOARD_PAGE: &str = include_str!("../static/dashboard.html");

/// Build the router over a shared service.
pub fn router(data: Arc<MarketData>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/api/stocks", get(get_stocks))
        .route("/api/refresh", get(refresh_stocks))
        .route("/api/historical", get(get_historical))
        .route("/api/markets", get(get_markets))
        .with_state(data)
}

/// Raw `/api/historical` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct HistoricalParams {
    symbols: Option<String>,
    market: Option<String>,
    start: Option<String>,
    end: Option<String>,
    interval: Option<String>,
}

/// JSON error body with a status derived from the error kind.
pub struct ApiError(MarketError);

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            MarketError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

async fn blocking<T, F>(task: F) -> Result<T, MarketError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| MarketError::Task(e.to_string()))
}

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

async fn get_stocks(State(data): State<Arc<MarketData>>) -> Result<Json<QuoteSnapshot>, ApiError> {
    let snapshot = blocking(move || data.load()).await?;
    Ok(Json(snapshot))
}

async fn refresh_stocks(
    State(data): State<Arc<MarketData>>,
) -> Result<Json<QuoteSnapshot>, ApiError> {
    let snapshot = blocking(move || data.fetch_quotes()).await?;
    Ok(Json(snapshot))
}

async fn get_historical(
    State(data): State<Arc<MarketData>>,
    Query(params): Query<HistoricalParams>,
) -> Result<Json<HistoricalData>, ApiError> {
    let request = HistoricalRequest::from_params(
        params.symbols.as_deref(),
        params.market.as_deref(),
        params.start.as_deref(),
        params.end.as_deref(),
        params.interval.as_deref(),
        Local::now().date_naive(),
    )?;
    let series = blocking(move || data.fetch_historical(&request)).await??;
    Ok(Json(series))
}

async fn get_markets(State(data): State<Arc<MarketData>>) -> Json<Vec<String>> {
    Json(data.markets())
}
