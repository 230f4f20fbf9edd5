use std::fmt;

use serde::{Deserialize, Serialize};

/// One of five ordered qualitative sentiment buckets.
///
/// Serialized with the display strings the dashboard frontend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentRegime {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl SentimentRegime {
    pub fn is_extreme_fear(self) -> bool {
        self == SentimentRegime::ExtremeFear
    }

    pub fn is_extreme_greed(self) -> bool {
        self == SentimentRegime::ExtremeGreed
    }
}

impl fmt::Display for SentimentRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentimentRegime::ExtremeFear => "Extreme Fear",
            SentimentRegime::Fear => "Fear",
            SentimentRegime::Neutral => "Neutral",
            SentimentRegime::Greed => "Greed",
            SentimentRegime::ExtremeGreed => "Extreme Greed",
        };
        f.write_str(name)
    }
}

/// Classify a Fear & Greed index value into a regime.
///
/// Boundary edges are part of the contract: the extreme-fear threshold and
/// the neutral band [45, 55] are inclusive, everything else exclusive.
/// Threshold inversion (fear >= 45 or greed <= 55) is rejected upstream by
/// parameter validation; this function assumes sane thresholds.
pub fn classify(value: f64, fear_threshold: f64, greed_threshold: f64) -> SentimentRegime {
    if value <= fear_threshold {
        SentimentRegime::ExtremeFear
    } else if value < 45.0 {
        SentimentRegime::Fear
    } else if value <= 55.0 {
        SentimentRegime::Neutral
    } else if value < greed_threshold {
        SentimentRegime::Greed
    } else {
        SentimentRegime::ExtremeGreed
    }
}

/// Mean and sample standard deviation of the sentiment index.
///
/// Returns (0.0, 0.0) for an empty series and a zero std for a single
/// reading.
pub fn summarize(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() < 2 {
        0.0
    } else {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    };
    (mean, std)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(value: f64) -> SentimentRegime {
        classify(value, 25.0, 75.0)
    }

    #[test]
    fn boundary_contract_with_default_thresholds() {
        use SentimentRegime::*;
        // The extreme-fear threshold is inclusive, the extreme-greed
        // threshold is reached at exactly the threshold value.
        let cases = [
            (25.0, ExtremeFear),
            (26.0, Fear),
            (44.0, Fear),
            (45.0, Neutral),
            (55.0, Neutral),
            (56.0, Greed),
            (74.0, Greed),
            (75.0, ExtremeGreed),
            (76.0, ExtremeGreed),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_default(value), expected, "value = {value}");
        }
    }

    #[test]
    fn extremes() {
        assert_eq!(classify_default(0.0), SentimentRegime::ExtremeFear);
        assert_eq!(classify_default(100.0), SentimentRegime::ExtremeGreed);
    }

    #[test]
    fn custom_thresholds_move_the_extreme_bands() {
        assert_eq!(classify(30.0, 35.0, 75.0), SentimentRegime::ExtremeFear);
        assert_eq!(classify(70.0, 25.0, 65.0), SentimentRegime::ExtremeGreed);
    }

    #[test]
    fn display_matches_serde_names() {
        let json = serde_json::to_string(&SentimentRegime::ExtremeFear).unwrap();
        assert_eq!(json, "\"Extreme Fear\"");
        assert_eq!(SentimentRegime::ExtremeGreed.to_string(), "Extreme Greed");
        assert_eq!(SentimentRegime::Neutral.to_string(), "Neutral");
    }

    #[test]
    fn summarize_handles_empty_and_single() {
        assert_eq!(summarize(&[]), (0.0, 0.0));
        assert_eq!(summarize(&[40.0]), (40.0, 0.0));
    }

    #[test]
    fn summarize_mean_and_sample_std() {
        let (mean, std) = summarize(&[10.0, 20.0, 30.0, 40.0]);
        assert!((mean - 25.0).abs() < 1e-12);
        assert!((std - 12.909944487358056).abs() < 1e-9);
    }
}
