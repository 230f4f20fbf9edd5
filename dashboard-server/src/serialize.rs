//! JSON payload builders for the dashboard charts.
//!
//! Rounding happens here and only here: the core never rounds. Prices and
//! moving averages go out with 2 decimals, equity curves with 3, the
//! sentiment index with 0. Undefined warm-up cells stay JSON `null`.

use serde::Serialize;

use strategy_core::{latest_recommendation, BacktestMetrics, DailyFrame, TradeSignal};

#[derive(Debug, Serialize)]
pub struct TimeSeriesPayload {
    pub dates: Vec<String>,
    pub close: Vec<f64>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub kalman_trend: Vec<f64>,
    pub position: Vec<u8>,
    pub trade_signal: Vec<&'static str>,
    pub buy_indices: Vec<usize>,
    pub sell_indices: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct SentimentPayload {
    pub dates: Vec<String>,
    pub fg_value: Vec<f64>,
    pub sentiment_regime: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PerformancePayload {
    pub dates: Vec<String>,
    pub strategy_equity: Vec<f64>,
    pub benchmark_equity: Vec<f64>,
    pub metrics: BacktestMetrics,
    pub latest_signal: &'static str,
    pub latest_explanation: String,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn rounded(values: &[f64], decimals: i32) -> Vec<f64> {
    values.iter().map(|&v| round_to(v, decimals)).collect()
}

fn rounded_opt(values: &[Option<f64>], decimals: i32) -> Vec<Option<f64>> {
    values.iter().map(|v| v.map(|v| round_to(v, decimals))).collect()
}

fn iso_dates(frame: &DailyFrame) -> Vec<String> {
    frame.dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()
}

pub fn time_series_payload(frame: &DailyFrame) -> TimeSeriesPayload {
    let trade_signal: Vec<&'static str> =
        frame.trade_signal.iter().map(|s| s.as_str()).collect();
    let buy_indices = signal_indices(&frame.trade_signal, TradeSignal::Buy);
    let sell_indices = signal_indices(&frame.trade_signal, TradeSignal::Sell);

    TimeSeriesPayload {
        dates: iso_dates(frame),
        close: rounded(&frame.close, 2),
        sma_short: rounded_opt(&frame.sma_short, 2),
        sma_long: rounded_opt(&frame.sma_long, 2),
        bb_middle: rounded_opt(&frame.bb_middle, 2),
        bb_upper: rounded_opt(&frame.bb_upper, 2),
        bb_lower: rounded_opt(&frame.bb_lower, 2),
        kalman_trend: rounded(&frame.kalman_trend, 2),
        position: frame.position.clone(),
        trade_signal,
        buy_indices,
        sell_indices,
    }
}

pub fn sentiment_payload(frame: &DailyFrame) -> SentimentPayload {
    SentimentPayload {
        dates: iso_dates(frame),
        fg_value: rounded(&frame.fg_value, 0),
        sentiment_regime: frame
            .sentiment_regime
            .iter()
            .map(|r| r.to_string())
            .collect(),
    }
}

pub fn performance_payload(
    frame: &DailyFrame,
    metrics: &BacktestMetrics,
) -> PerformancePayload {
    let (signal, explanation) = latest_recommendation(frame);
    PerformancePayload {
        dates: iso_dates(frame),
        strategy_equity: rounded(&frame.strategy_equity, 3),
        benchmark_equity: rounded(&frame.benchmark_equity, 3),
        metrics: metrics.clone(),
        latest_signal: signal.as_str(),
        latest_explanation: explanation,
    }
}

fn signal_indices(signals: &[TradeSignal], wanted: TradeSignal) -> Vec<usize> {
    signals
        .iter()
        .enumerate()
        .filter(|(_, &s)| s == wanted)
        .map(|(i, _)| i)
        .collect()
}
