//! Deterministic analytics core for the Bitcoin sentiment strategy.
//!
//! The crate operates on a single aligned daily series of prices and
//! Fear & Greed sentiment readings: it computes technical indicators,
//! classifies sentiment regimes, runs a stateful long/flat rule, and
//! replays the resulting positions through a backtest accounting engine.
//! Everything here is pure, synchronous, batch computation; data loading
//! and serving live in `dashboard-server`.

pub mod backtest;
pub mod error;
pub mod frame;
pub mod indicators;
pub mod params;
pub mod pipeline;
pub mod sentiment;
pub mod signal;

pub use backtest::{run_backtest, BacktestMetrics};
pub use error::StrategyError;
pub use frame::DailyFrame;
pub use params::StrategyParams;
pub use pipeline::{latest_recommendation, run_pipeline};
pub use sentiment::SentimentRegime;
pub use signal::TradeSignal;
