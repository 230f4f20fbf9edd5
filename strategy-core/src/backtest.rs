//! Backtest accounting: replay positions against realized returns with a
//! one-day execution lag and summarize risk/return metrics.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StrategyError;
use crate::frame::DailyFrame;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary metrics of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub strategy_cumulative_return: f64,
    pub benchmark_cumulative_return: f64,
    pub strategy_max_drawdown: f64,
    pub strategy_sharpe_ratio: f64,
    pub strategy_hit_rate: f64,
}

impl BacktestMetrics {
    fn zeroed() -> Self {
        Self {
            strategy_cumulative_return: 0.0,
            benchmark_cumulative_return: 0.0,
            strategy_max_drawdown: 0.0,
            strategy_sharpe_ratio: 0.0,
            strategy_hit_rate: 0.0,
        }
    }
}

/// Replay the `position` column against the `return` column.
///
/// Positions are lagged one day before being applied: the position decided
/// with day-i information earns the day-(i+1) return, which removes
/// look-ahead bias. Fills `strategy_return`, `strategy_equity`, and
/// `benchmark_equity` on the frame and returns the metrics record.
///
/// Degenerate statistics are defined fallbacks, not errors: zero-variance
/// strategy returns give a Sharpe of 0, and a backtest with no invested days
/// gives a hit rate of 0.
pub fn run_backtest(frame: &mut DailyFrame) -> Result<BacktestMetrics, StrategyError> {
    let n = frame.len();
    if frame.position.len() != n {
        return Err(StrategyError::MissingColumn("position"));
    }
    if n == 0 {
        return Ok(BacktestMetrics::zeroed());
    }

    let mut strategy_return = Vec::with_capacity(n);
    let mut strategy_equity = Vec::with_capacity(n);
    let mut benchmark_equity = Vec::with_capacity(n);

    let mut strat_level = 1.0;
    let mut bench_level = 1.0;
    let mut peak = f64::MIN;
    let mut max_drawdown = 0.0f64;
    let mut active_days = 0usize;
    let mut winning_days = 0usize;

    for i in 0..n {
        let lagged = if i == 0 { 0 } else { frame.position[i - 1] };
        let r = f64::from(lagged) * frame.ret[i];
        strategy_return.push(r);

        strat_level *= 1.0 + r;
        bench_level *= 1.0 + frame.ret[i];
        strategy_equity.push(strat_level);
        benchmark_equity.push(bench_level);

        peak = peak.max(strat_level);
        max_drawdown = max_drawdown.min(strat_level / peak - 1.0);

        if lagged != 0 {
            active_days += 1;
            if r > 0.0 {
                winning_days += 1;
            }
        }
    }

    let mean = strategy_return.iter().sum::<f64>() / n as f64;
    let std = if n < 2 {
        0.0
    } else {
        (strategy_return
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / (n as f64 - 1.0))
            .sqrt()
    };
    let sharpe_ratio = if std > 0.0 {
        mean / std * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        warn!("zero-variance strategy returns, reporting Sharpe ratio of 0");
        0.0
    };

    let hit_rate = if active_days > 0 {
        winning_days as f64 / active_days as f64
    } else {
        0.0
    };

    let metrics = BacktestMetrics {
        strategy_cumulative_return: strat_level - 1.0,
        benchmark_cumulative_return: bench_level - 1.0,
        strategy_max_drawdown: max_drawdown,
        strategy_sharpe_ratio: sharpe_ratio,
        strategy_hit_rate: hit_rate,
    };

    frame.strategy_return = strategy_return;
    frame.strategy_equity = strategy_equity;
    frame.benchmark_equity = benchmark_equity;
    Ok(metrics)
}
