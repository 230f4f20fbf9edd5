//! HTTP API exposing the pipeline results to the dashboard frontend.

use std::sync::Arc;

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Deserializer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use strategy_core::{DailyFrame, StrategyParams};

use crate::cache::{PipelineResult, ResultCache};
use crate::error::ServerError;
use crate::serialize::{
    performance_payload, sentiment_payload, time_series_payload, PerformancePayload,
    SentimentPayload, TimeSeriesPayload,
};

/// Shared state: the merged input series loaded at startup plus the
/// parameter-keyed result cache.
#[derive(Clone)]
pub struct AppState {
    pub base: Arc<DailyFrame>,
    pub cache: Arc<ResultCache>,
}

impl AppState {
    pub fn new(base: DailyFrame) -> Self {
        Self {
            base: Arc::new(base),
            cache: Arc::new(ResultCache::new()),
        }
    }

    async fn run(&self, query: StrategyQuery) -> Result<Arc<PipelineResult>, ServerError> {
        let params = query.into_params();
        let result = self.cache.get_or_compute(&self.base, &params).await?;
        Ok(result)
    }
}

/// Strategy knobs exposed on the query string; anything omitted or
/// unparseable falls back to the documented defaults rather than rejecting
/// the request.
#[derive(Debug, Default, Deserialize)]
pub struct StrategyQuery {
    #[serde(default, deserialize_with = "lenient")]
    pub short_window: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub long_window: Option<usize>,
    #[serde(default, deserialize_with = "lenient")]
    pub extreme_fear: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub extreme_greed: Option<f64>,
}

/// Parse a query value if possible, `None` (default) otherwise.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

impl StrategyQuery {
    fn into_params(self) -> StrategyParams {
        let defaults = StrategyParams::default();
        StrategyParams {
            short_window: self.short_window.unwrap_or(defaults.short_window),
            long_window: self.long_window.unwrap_or(defaults.long_window),
            extreme_fear_threshold: self
                .extreme_fear
                .unwrap_or(defaults.extreme_fear_threshold),
            extreme_greed_threshold: self
                .extreme_greed
                .unwrap_or(defaults.extreme_greed_threshold),
            ..defaults
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/time_series", get(api_time_series))
        .route("/api/sentiment", get(api_sentiment))
        .route("/api/performance", get(api_performance))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Full application: the API routes plus the static dashboard frontend,
/// with `index.html` served at the root.
pub fn app(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    router(state).fallback_service(ServeDir::new(static_dir.as_ref()))
}

async fn api_time_series(
    State(state): State<AppState>,
    Query(query): Query<StrategyQuery>,
) -> Result<Json<TimeSeriesPayload>, ServerError> {
    let result = state.run(query).await?;
    Ok(Json(time_series_payload(&result.frame)))
}

async fn api_sentiment(
    State(state): State<AppState>,
    Query(query): Query<StrategyQuery>,
) -> Result<Json<SentimentPayload>, ServerError> {
    let result = state.run(query).await?;
    Ok(Json(sentiment_payload(&result.frame)))
}

async fn api_performance(
    State(state): State<AppState>,
    Query(query): Query<StrategyQuery>,
) -> Result<Json<PerformancePayload>, ServerError> {
    let result = state.run(query).await?;
    Ok(Json(performance_payload(&result.frame, &result.metrics)))
}
