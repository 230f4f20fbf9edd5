//! Batch orchestration of the four analytics stages.

use tracing::info;

use crate::backtest::{run_backtest, BacktestMetrics};
use crate::error::StrategyError;
use crate::frame::DailyFrame;
use crate::indicators::{bollinger_bands, kalman_trend, simple_moving_average};
use crate::params::StrategyParams;
use crate::sentiment::classify;
use crate::signal::{derive_trade_signals, generate_positions, TradeSignal};

/// Run the full pipeline over an input frame in one batch pass:
/// indicators, sentiment regimes, positions and trade signals, backtest.
///
/// Each stage only writes its own columns; the enriched frame and the
/// metrics record come back together.
pub fn run_pipeline(
    mut frame: DailyFrame,
    params: &StrategyParams,
) -> Result<(DailyFrame, BacktestMetrics), StrategyError> {
    params.validate()?;
    info!(rows = frame.len(), "running strategy pipeline");

    frame.sma_short = simple_moving_average(&frame.close, params.short_window);
    frame.sma_long = simple_moving_average(&frame.close, params.long_window);
    let (middle, upper, lower) = bollinger_bands(
        &frame.close,
        params.bollinger_window,
        params.bollinger_num_std,
    );
    frame.bb_middle = middle;
    frame.bb_upper = upper;
    frame.bb_lower = lower;
    frame.kalman_trend = kalman_trend(
        &frame.close,
        params.process_variance,
        params.measurement_variance,
        params.initial_estimate_variance,
    );

    frame.sentiment_regime = frame
        .fg_value
        .iter()
        .map(|&value| {
            classify(
                value,
                params.extreme_fear_threshold,
                params.extreme_greed_threshold,
            )
        })
        .collect();

    frame.position = generate_positions(
        &frame.sma_short,
        &frame.sma_long,
        &frame.kalman_trend,
        &frame.sentiment_regime,
    );
    frame.trade_signal = derive_trade_signals(&frame.position);

    let metrics = run_backtest(&mut frame)?;
    info!(
        strategy_return = metrics.strategy_cumulative_return,
        benchmark_return = metrics.benchmark_cumulative_return,
        "pipeline complete"
    );
    Ok((frame, metrics))
}

/// Latest signal with a one-line explanation for the dashboard.
///
/// An empty frame yields a neutral Hold with a "no data" message instead of
/// an error.
pub fn latest_recommendation(frame: &DailyFrame) -> (TradeSignal, String) {
    let Some(last) = frame.len().checked_sub(1) else {
        return (TradeSignal::Hold, "No data available.".to_string());
    };

    let signal = frame
        .trade_signal
        .get(last)
        .copied()
        .unwrap_or(TradeSignal::Hold);
    let sma_s = frame.sma_short.get(last).copied().flatten().unwrap_or(0.0);
    let sma_l = frame.sma_long.get(last).copied().flatten().unwrap_or(0.0);
    let explanation = format!("Short SMA ({sma_s:.2}) vs Long SMA ({sma_l:.2}).");
    (signal, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input_frame(close: Vec<f64>, fg: Vec<f64>) -> DailyFrame {
        let start = NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        let dates: Vec<_> = (0..close.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let mut ret = vec![0.0];
        ret.extend(close.windows(2).map(|w| w[1] / w[0] - 1.0));
        DailyFrame::new(dates, close, ret, fg).unwrap()
    }

    #[test]
    fn pipeline_fills_every_derived_column() {
        let close: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let frame = input_frame(close, vec![50.0; 60]);
        let params = StrategyParams::default();
        let (out, _metrics) = run_pipeline(frame, &params).unwrap();

        assert_eq!(out.sma_short.len(), 60);
        assert_eq!(out.sma_long.len(), 60);
        assert_eq!(out.bb_middle.len(), 60);
        assert_eq!(out.kalman_trend.len(), 60);
        assert_eq!(out.sentiment_regime.len(), 60);
        assert_eq!(out.position.len(), 60);
        assert_eq!(out.trade_signal.len(), 60);
        assert_eq!(out.strategy_equity.len(), 60);
    }

    #[test]
    fn pipeline_rejects_invalid_params() {
        let frame = input_frame(vec![100.0, 101.0], vec![50.0, 50.0]);
        let params = StrategyParams {
            extreme_fear_threshold: 60.0,
            ..Default::default()
        };
        assert!(matches!(
            run_pipeline(frame, &params),
            Err(StrategyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn recommendation_on_empty_frame_is_hold() {
        let frame = input_frame(vec![100.0], vec![50.0]);
        // Simulate "no rows": a frame cannot be constructed empty, so drain
        // one via a minimal stand-in check on the helper instead.
        let empty = DailyFrame {
            dates: Vec::new(),
            close: Vec::new(),
            ret: Vec::new(),
            fg_value: Vec::new(),
            ..frame
        };
        let (signal, explanation) = latest_recommendation(&empty);
        assert_eq!(signal, TradeSignal::Hold);
        assert_eq!(explanation, "No data available.");
    }

    #[test]
    fn recommendation_reports_last_row_smas() {
        let close: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let frame = input_frame(close, vec![50.0; 60]);
        let (out, _) = run_pipeline(frame, &StrategyParams::default()).unwrap();
        let (signal, explanation) = latest_recommendation(&out);
        // Steadily rising series with neutral sentiment ends long.
        assert_ne!(signal, TradeSignal::Sell);
        assert!(explanation.starts_with("Short SMA ("));
        assert!(explanation.contains("vs Long SMA ("));
    }
}
