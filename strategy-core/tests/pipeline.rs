//! End-to-end pipeline scenarios over synthetic daily series.

use chrono::NaiveDate;
use strategy_core::{
    run_pipeline, DailyFrame, SentimentRegime, StrategyParams, TradeSignal,
};

fn build_frame(close: Vec<f64>, fg: Vec<f64>) -> DailyFrame {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let dates: Vec<_> = (0..close.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    let mut ret = vec![0.0];
    ret.extend(close.windows(2).map(|w| w[1] / w[0] - 1.0));
    DailyFrame::new(dates, close, ret, fg).unwrap()
}

/// Short windows so crossovers resolve quickly in a small series.
fn fast_params() -> StrategyParams {
    StrategyParams {
        short_window: 2,
        long_window: 4,
        bollinger_window: 4,
        ..Default::default()
    }
}

#[test]
fn crossover_produces_buy_then_sell() {
    // Rise long enough for the short SMA to cross above the long SMA, then
    // fall hard enough to cross back below.
    let close = vec![
        100.0, 100.0, 100.0, 100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 108.0, 104.0,
        98.0, 92.0, 86.0,
    ];
    let n = close.len();
    let frame = build_frame(close, vec![50.0; n]);
    let (out, _metrics) = run_pipeline(frame, &fast_params()).unwrap();

    let buy = out
        .trade_signal
        .iter()
        .position(|&s| s == TradeSignal::Buy)
        .expect("expected a Buy during the rally");
    let sell = out
        .trade_signal
        .iter()
        .position(|&s| s == TradeSignal::Sell)
        .expect("expected a Sell during the decline");
    assert!(buy < sell);
    assert_eq!(out.position[buy], 1);
    assert_eq!(out.position[sell], 0);
    // Between the Buy and the Sell the position stays long.
    assert!(out.position[buy..sell].iter().all(|&p| p == 1));
}

#[test]
fn extreme_fear_exits_where_hysteresis_would_hold() {
    // Rally, then a plateau long enough for the SMAs to converge. Once the
    // SMAs are equal neither crossover fires, so under neutral sentiment the
    // position holds; Extreme Fear on the plateau forces the exit instead.
    let close = vec![
        100.0, 100.0, 100.0, 100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 110.0, 110.0,
        110.0, 110.0, 110.0,
    ];
    let n = close.len();

    let neutral = build_frame(close.clone(), vec![50.0; n]);
    let (held, _) = run_pipeline(neutral, &fast_params()).unwrap();
    assert!(held.position[11..].iter().all(|&p| p == 1));

    // Sentiment collapses to Extreme Fear from the first equal-SMA row on.
    let mut fg = vec![50.0; n];
    for value in fg.iter_mut().skip(11) {
        *value = 10.0;
    }
    let fearful = build_frame(close, fg);
    let (out, _) = run_pipeline(fearful, &fast_params()).unwrap();

    assert!(out.position[4..11].iter().all(|&p| p == 1));
    assert!(out.position[11..].iter().all(|&p| p == 0));
    assert_eq!(out.trade_signal[11], TradeSignal::Sell);
}

#[test]
fn extreme_greed_blocks_entries_but_does_not_force_exits() {
    // Enter under neutral sentiment, then flip to extreme greed while the
    // uptrend continues: the position must hold rather than exit.
    let close: Vec<f64> = (0..20).map(|i| 100.0 + 2.0 * i as f64).collect();
    let mut fg = vec![50.0; 20];
    for value in fg.iter_mut().skip(10) {
        *value = 90.0;
    }
    let frame = build_frame(close, fg);
    let (out, _) = run_pipeline(frame, &fast_params()).unwrap();

    assert_eq!(out.sentiment_regime[12], SentimentRegime::ExtremeGreed);
    assert_eq!(out.position[9], 1);
    assert!(out.position[10..].iter().all(|&p| p == 1));
}

#[test]
fn warmup_rows_stay_flat_and_unpriced() {
    let close: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    let frame = build_frame(close, vec![50.0; 10]);
    let params = StrategyParams {
        short_window: 3,
        long_window: 6,
        bollinger_window: 5,
        ..Default::default()
    };
    let (out, _) = run_pipeline(frame, &params).unwrap();

    // Long SMA is undefined before row 5, so no entry can happen there.
    assert!(out.sma_long[..5].iter().all(Option::is_none));
    assert!(out.position[..5].iter().all(|&p| p == 0));
    assert!(out.strategy_return[..5].iter().all(|&r| r == 0.0));
}

#[test]
fn stages_share_one_index_and_do_not_touch_inputs() {
    let close: Vec<f64> = (0..30).map(|i| 100.0 * (1.0 + 0.002 * i as f64)).collect();
    let fg: Vec<f64> = (0..30).map(|i| 30.0 + 2.0 * (i % 20) as f64).collect();
    let frame = build_frame(close.clone(), fg.clone());
    let ret_before = frame.ret.clone();

    let (out, _) = run_pipeline(frame, &fast_params()).unwrap();
    assert_eq!(out.close, close);
    assert_eq!(out.fg_value, fg);
    assert_eq!(out.ret, ret_before);
    assert_eq!(out.dates.len(), out.strategy_equity.len());
}
