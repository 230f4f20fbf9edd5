use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use strategy_core::StrategyError;

/// Serving-layer error types.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data error: {0}")]
    Data(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Bad strategy parameters come from the query string.
            ServerError::Strategy(StrategyError::InvalidParameter(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
