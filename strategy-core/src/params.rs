use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// Tunable parameters of the full pipeline.
///
/// Passed explicitly through every stage; the core keeps no global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub short_window: usize,
    pub long_window: usize,
    pub bollinger_window: usize,
    pub bollinger_num_std: f64,
    pub extreme_fear_threshold: f64,
    pub extreme_greed_threshold: f64,
    pub process_variance: f64,
    pub measurement_variance: f64,
    pub initial_estimate_variance: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 50,
            bollinger_window: 20,
            bollinger_num_std: 2.0,
            extreme_fear_threshold: 25.0,
            extreme_greed_threshold: 75.0,
            process_variance: 1e-5,
            measurement_variance: 1e-2,
            initial_estimate_variance: 1.0,
        }
    }
}

impl StrategyParams {
    /// Validate parameter sanity before any computation starts.
    ///
    /// Sentiment threshold inversion (fear threshold reaching the neutral
    /// band, or greed threshold inside it) would scramble the regime bands,
    /// so it is rejected outright instead of producing surprising
    /// classifications.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(StrategyError::InvalidParameter(
                "moving average windows must be at least 1".into(),
            ));
        }
        if self.bollinger_window < 2 {
            return Err(StrategyError::InvalidParameter(
                "bollinger window must be at least 2".into(),
            ));
        }
        if self.bollinger_num_std < 0.0 {
            return Err(StrategyError::InvalidParameter(
                "bollinger band width must be non-negative".into(),
            ));
        }
        if self.extreme_fear_threshold >= 45.0 {
            return Err(StrategyError::InvalidParameter(format!(
                "extreme fear threshold {} overlaps the neutral band (must be < 45)",
                self.extreme_fear_threshold
            )));
        }
        if self.extreme_greed_threshold <= 55.0 {
            return Err(StrategyError::InvalidParameter(format!(
                "extreme greed threshold {} overlaps the neutral band (must be > 55)",
                self.extreme_greed_threshold
            )));
        }
        if self.process_variance <= 0.0
            || self.measurement_variance <= 0.0
            || self.initial_estimate_variance <= 0.0
        {
            return Err(StrategyError::InvalidParameter(
                "kalman variances must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Canonical cache key: fixed field order, full float precision.
    ///
    /// The serving layer keys its result cache on this string so that equal
    /// parameter sets share one entry; the core itself stays stateless.
    pub fn cache_key(&self) -> String {
        format!(
            "sw={};lw={};bw={};bstd={};ef={};eg={};pv={};mv={};iv={}",
            self.short_window,
            self.long_window,
            self.bollinger_window,
            self.bollinger_num_std,
            self.extreme_fear_threshold,
            self.extreme_greed_threshold,
            self.process_variance,
            self.measurement_variance,
            self.initial_estimate_variance,
        )
    }
}
