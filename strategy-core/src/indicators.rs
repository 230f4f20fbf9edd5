//! Rolling and recursive indicators over a daily price series.
//!
//! Every function here is free of look-ahead: the value at index `i` depends
//! only on observations at indices `<= i`.

/// Trailing simple moving average.
///
/// The value at position `i` requires `window` observations ending at `i`
/// inclusive; earlier positions are `None`. `window` must be at least 1
/// (enforced by [`crate::StrategyParams::validate`]).
pub fn simple_moving_average(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(prices.len());
    let mut sum = 0.0;
    for (i, &price) in prices.iter().enumerate() {
        sum += price;
        if i >= window {
            sum -= prices[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Bollinger bands: rolling mean plus/minus `num_std` rolling sample
/// standard deviations (ddof = 1). All three bands are `None` wherever the
/// window is incomplete, and the sample std needs at least two observations,
/// so `window` must be at least 2.
pub fn bollinger_bands(
    prices: &[f64],
    window: usize,
    num_std: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>) {
    let n = prices.len();
    let mut middle = vec![None; n];
    let mut upper = vec![None; n];
    let mut lower = vec![None; n];
    if window < 2 {
        return (middle, upper, lower);
    }

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for (i, &price) in prices.iter().enumerate() {
        sum += price;
        sum_sq += price * price;
        if i >= window {
            let old = prices[i - window];
            sum -= old;
            sum_sq -= old * old;
        }
        if i + 1 >= window {
            let w = window as f64;
            let mean = sum / w;
            // Sample variance; the running-sum form can go marginally
            // negative on constant series, clamp before the sqrt.
            let var = ((sum_sq - sum * sum / w) / (w - 1.0)).max(0.0);
            let half_width = num_std * var.sqrt();
            middle[i] = Some(mean);
            upper[i] = Some(mean + half_width);
            lower[i] = Some(mean - half_width);
        }
    }
    (middle, upper, lower)
}

/// Recursive scalar trend estimate (1-D Kalman filter).
///
/// State is the pair (estimate, estimate variance), seeded with the first
/// observation and `initial_estimate_variance`. Each step predicts, computes
/// the gain, corrects toward the observation, and shrinks the variance. The
/// output is defined at every step, the first being `prices[0]`; an empty
/// input yields an empty output. Strictly sequential by construction.
pub fn kalman_trend(
    prices: &[f64],
    process_variance: f64,
    measurement_variance: f64,
    initial_estimate_variance: f64,
) -> Vec<f64> {
    let Some((&first, rest)) = prices.split_first() else {
        return Vec::new();
    };

    let mut estimates = Vec::with_capacity(prices.len());
    let mut estimate = first;
    let mut estimate_variance = initial_estimate_variance;
    estimates.push(estimate);

    for &observation in rest {
        estimate_variance += process_variance;
        let gain = estimate_variance / (estimate_variance + measurement_variance);
        estimate += gain * (observation - estimate);
        estimate_variance *= 1.0 - gain;
        estimates.push(estimate);
    }
    estimates
}
