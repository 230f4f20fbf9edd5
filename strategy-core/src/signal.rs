//! Long/flat position state machine and trade signal derivation.

use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentRegime;

/// Discrete trading event derived from position transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSignal {
    Buy,
    Sell,
    Hold,
}

impl TradeSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSignal::Buy => "Buy",
            TradeSignal::Sell => "Sell",
            TradeSignal::Hold => "Hold",
        }
    }
}

/// Advance the long/flat state machine over the full series.
///
/// The state is a single position flag, initialized flat, updated row by row
/// in date order:
/// - enter long when the short SMA is above the long SMA, the trend estimate
///   is positive, and sentiment is not Extreme Greed;
/// - exit (or stay out) when the short SMA is below the long SMA or sentiment
///   is Extreme Fear;
/// - otherwise hold the previous state. SMA equality triggers neither
///   condition, which is the intended hysteresis.
///
/// SMA cells are `None` during warm-up; comparisons involving an undefined
/// cell are false, so the state simply holds.
pub fn generate_positions(
    sma_short: &[Option<f64>],
    sma_long: &[Option<f64>],
    trend: &[f64],
    regimes: &[SentimentRegime],
) -> Vec<u8> {
    let n = sma_short.len();
    let mut positions = Vec::with_capacity(n);
    let mut current_position = 0u8;

    for i in 0..n {
        let smas = sma_short[i].zip(sma_long[i]);
        let crossed_above = smas.map(|(s, l)| s > l).unwrap_or(false);
        let crossed_below = smas.map(|(s, l)| s < l).unwrap_or(false);

        let enter_long =
            crossed_above && trend[i] > 0.0 && !regimes[i].is_extreme_greed();
        let exit_or_avoid = crossed_below || regimes[i].is_extreme_fear();

        if enter_long {
            current_position = 1;
        } else if exit_or_avoid {
            current_position = 0;
        }
        positions.push(current_position);
    }
    positions
}

/// Derive Buy/Sell/Hold events from consecutive position differences.
///
/// The row before the first is treated as flat, so a series starting long
/// opens with a Buy.
pub fn derive_trade_signals(positions: &[u8]) -> Vec<TradeSignal> {
    let mut signals = Vec::with_capacity(positions.len());
    let mut previous = 0u8;
    for &position in positions {
        let signal = match (previous, position) {
            (0, 1) => TradeSignal::Buy,
            (1, 0) => TradeSignal::Sell,
            _ => TradeSignal::Hold,
        };
        signals.push(signal);
        previous = position;
    }
    signals
}
