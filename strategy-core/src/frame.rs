use chrono::NaiveDate;
use serde::Serialize;

use crate::error::StrategyError;
use crate::sentiment::SentimentRegime;
use crate::signal::TradeSignal;

/// Aligned daily time series, stored as a typed record of columns.
///
/// One row per trading day, indexed by strictly ascending unique dates.
/// The input columns (`close`, `ret`, `fg_value`) are required and total;
/// derived columns start empty and are filled by exactly one pipeline stage
/// each. Columns with a warm-up period use `Option<f64>` cells, columns
/// defined for every row use plain `f64`. No stage adds or removes rows, and
/// no stage overwrites a column another stage owns.
#[derive(Debug, Clone, Serialize)]
pub struct DailyFrame {
    pub dates: Vec<NaiveDate>,
    /// Daily close price, > 0.
    pub close: Vec<f64>,
    /// Simple daily percentage change of `close`. The leading row without a
    /// defined return is dropped upstream, so this column is total.
    pub ret: Vec<f64>,
    /// Fear & Greed index in [0, 100], forward-filled upstream.
    pub fg_value: Vec<f64>,

    // Indicator engine outputs.
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub kalman_trend: Vec<f64>,

    // Sentiment classifier output.
    pub sentiment_regime: Vec<SentimentRegime>,

    // Signal generator outputs.
    pub position: Vec<u8>,
    pub trade_signal: Vec<TradeSignal>,

    // Backtest engine outputs.
    pub strategy_return: Vec<f64>,
    pub strategy_equity: Vec<f64>,
    pub benchmark_equity: Vec<f64>,
}

impl DailyFrame {
    /// Build a frame from the required input columns, validating shape.
    pub fn new(
        dates: Vec<NaiveDate>,
        close: Vec<f64>,
        ret: Vec<f64>,
        fg_value: Vec<f64>,
    ) -> Result<Self, StrategyError> {
        if dates.is_empty() {
            return Err(StrategyError::MissingColumn("dates"));
        }
        let expected = dates.len();
        for (name, len) in [
            ("close", close.len()),
            ("return", ret.len()),
            ("fg_value", fg_value.len()),
        ] {
            if len != expected {
                return Err(StrategyError::LengthMismatch {
                    name,
                    expected,
                    actual: len,
                });
            }
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StrategyError::UnorderedDates);
        }

        Ok(Self {
            dates,
            close,
            ret,
            fg_value,
            sma_short: Vec::new(),
            sma_long: Vec::new(),
            bb_middle: Vec::new(),
            bb_upper: Vec::new(),
            bb_lower: Vec::new(),
            kalman_trend: Vec::new(),
            sentiment_regime: Vec::new(),
            position: Vec::new(),
            trade_signal: Vec::new(),
            strategy_return: Vec::new(),
            strategy_equity: Vec::new(),
            benchmark_equity: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n as u64)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn new_validates_column_lengths() {
        let err = DailyFrame::new(dates(3), vec![1.0, 2.0], vec![0.0; 3], vec![50.0; 3])
            .unwrap_err();
        assert!(matches!(
            err,
            StrategyError::LengthMismatch { name: "close", .. }
        ));
    }

    #[test]
    fn new_rejects_empty_input() {
        let err = DailyFrame::new(vec![], vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, StrategyError::MissingColumn("dates")));
    }

    #[test]
    fn new_rejects_unordered_dates() {
        let mut d = dates(3);
        d.swap(0, 2);
        let err =
            DailyFrame::new(d, vec![1.0; 3], vec![0.0; 3], vec![50.0; 3]).unwrap_err();
        assert!(matches!(err, StrategyError::UnorderedDates));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let mut d = dates(3);
        d[2] = d[1];
        let err =
            DailyFrame::new(d, vec![1.0; 3], vec![0.0; 3], vec![50.0; 3]).unwrap_err();
        assert!(matches!(err, StrategyError::UnorderedDates));
    }
}
