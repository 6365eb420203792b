//! Volatility contraction pattern heuristic
//!
//! A series matches when the recent daily high-low ranges are tight and the
//! moving averages line up for a breakout:
//!
//! - sample standard deviation of the last `recent_window` ranges is below
//!   the contraction threshold
//! - last close > short SMA > long SMA (strict)

use serde::{Deserialize, Serialize};
use ta::{Next, indicators::SimpleMovingAverage};

use crate::error::{Result, ScreenerError};
use crate::series::Bar;

/// Limit on the standard deviation of recent daily ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ContractionThreshold {
    /// Absolute price units. Not comparable across instruments of different
    /// price scales.
    Absolute(f64),
    /// Fraction of the latest close
    Relative(f64),
}

impl ContractionThreshold {
    pub fn value(&self) -> f64 {
        match *self {
            Self::Absolute(v) | Self::Relative(v) => v,
        }
    }

    /// True when the limit is expressed in price units
    pub fn is_scale_dependent(&self) -> bool {
        matches!(self, Self::Absolute(_))
    }

    fn admits(&self, range_std: f64, last_close: f64) -> bool {
        match *self {
            Self::Absolute(limit) => range_std < limit,
            Self::Relative(fraction) => last_close > 0.0 && range_std / last_close < fraction,
        }
    }
}

impl Default for ContractionThreshold {
    fn default() -> Self {
        Self::Absolute(15.0)
    }
}

/// How moving averages treat series shorter than their window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryPolicy {
    /// Average whatever closes are available
    #[default]
    Partial,
    /// Leave the average undefined, which fails the breakout test
    RequireFull,
}

/// Parameters of the heuristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VcpCriteria {
    pub recent_window: usize,
    pub short_window: usize,
    pub long_window: usize,
    pub threshold: ContractionThreshold,
    pub history_policy: HistoryPolicy,
}

impl Default for VcpCriteria {
    fn default() -> Self {
        Self {
            recent_window: 30,
            short_window: 50,
            long_window: 200,
            threshold: ContractionThreshold::default(),
            history_policy: HistoryPolicy::default(),
        }
    }
}

/// Intermediate values behind a verdict
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcpAssessment {
    pub observations: usize,
    pub range_std: Option<f64>,
    pub last_close: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub contracted: bool,
    pub breakout: bool,
}

impl VcpAssessment {
    pub fn is_match(&self) -> bool {
        self.contracted && self.breakout
    }
}

impl VcpCriteria {
    pub fn validate(&self) -> Result<()> {
        if self.recent_window == 0 || self.short_window == 0 || self.long_window == 0 {
            return Err(ScreenerError::ConfigError(
                "VCP windows must be greater than 0".to_string(),
            ));
        }

        if self.short_window >= self.long_window {
            return Err(ScreenerError::ConfigError(format!(
                "short SMA window ({}) must be shorter than long window ({})",
                self.short_window, self.long_window
            )));
        }

        let limit = self.threshold.value();
        if !limit.is_finite() || limit <= 0.0 {
            return Err(ScreenerError::ConfigError(format!(
                "contraction threshold must be a positive number, got {limit}"
            )));
        }

        Ok(())
    }

    /// Evaluate the heuristic over time-ordered bars
    pub fn evaluate(&self, bars: &[Bar]) -> VcpAssessment {
        if bars.is_empty() {
            return VcpAssessment::default();
        }

        let recent = &bars[bars.len().saturating_sub(self.recent_window)..];
        let ranges: Vec<f64> = recent.iter().map(Bar::range).collect();
        let range_std = sample_std_dev(&ranges);

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let last_close = closes.last().copied();
        let sma_short = self.trailing_sma(&closes, self.short_window);
        let sma_long = self.trailing_sma(&closes, self.long_window);

        let contracted = match (range_std, last_close) {
            (Some(std), Some(close)) => self.threshold.admits(std, close),
            _ => false,
        };
        let breakout = match (last_close, sma_short, sma_long) {
            (Some(close), Some(short), Some(long)) => close > short && short > long,
            _ => false,
        };

        VcpAssessment {
            observations: bars.len(),
            range_std,
            last_close,
            sma_short,
            sma_long,
            contracted,
            breakout,
        }
    }

    fn trailing_sma(&self, closes: &[f64], window: usize) -> Option<f64> {
        if closes.is_empty()
            || (self.history_policy == HistoryPolicy::RequireFull && closes.len() < window)
        {
            return None;
        }

        // ta's SMA divides by the number of samples seen until the window fills
        let mut sma = SimpleMovingAverage::new(window).ok()?;
        closes.iter().fold(None, |_, &close| Some(sma.next(close)))
    }
}

/// Evaluate with the default criteria
pub fn is_vcp(bars: &[Bar]) -> bool {
    VcpCriteria::default().evaluate(bars).is_match()
}

/// Sample standard deviation (n - 1); undefined below two values
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::fixtures::trending;

    #[test]
    fn test_empty_series_is_not_vcp() {
        assert!(!is_vcp(&[]));
        let assessment = VcpCriteria::default().evaluate(&[]);
        assert_eq!(assessment, VcpAssessment::default());
    }

    #[test]
    fn test_tight_uptrend_is_vcp() {
        let bars = trending(250, 100.0, 1.0, 1.0);
        let assessment = VcpCriteria::default().evaluate(&bars);

        assert_eq!(assessment.range_std, Some(0.0));
        assert!(assessment.contracted);
        assert!(assessment.breakout);
        assert!(assessment.is_match());
        assert!(is_vcp(&bars));
    }

    #[test]
    fn test_wide_ranges_fail_regardless_of_trend() {
        let mut bars = trending(250, 100.0, 1.0, 1.0);
        for (i, bar) in bars.iter_mut().enumerate() {
            let spread = if i % 2 == 0 { 0.5 } else { 50.0 };
            bar.high = bar.close + spread;
            bar.low = bar.close - spread;
        }

        let assessment = VcpCriteria::default().evaluate(&bars);
        assert!(assessment.range_std.unwrap() > 15.0);
        assert!(assessment.breakout);
        assert!(!assessment.is_match());
    }

    #[test]
    fn test_downtrend_has_no_breakout() {
        let bars = trending(250, 400.0, -1.0, 1.0);
        let assessment = VcpCriteria::default().evaluate(&bars);

        assert!(assessment.contracted);
        assert!(assessment.last_close < assessment.sma_short);
        assert!(!assessment.is_match());
    }

    #[test]
    fn test_flat_series_fails_strict_ordering() {
        let bars = trending(250, 100.0, 0.0, 1.0);
        assert!(!is_vcp(&bars));
    }

    #[test]
    fn test_single_bar_has_undefined_deviation() {
        let bars = trending(1, 100.0, 0.0, 1.0);
        let assessment = VcpCriteria::default().evaluate(&bars);
        assert_eq!(assessment.range_std, None);
        assert!(!assessment.contracted);
    }

    #[test]
    fn test_short_history_uses_partial_windows() {
        let bars = trending(120, 100.0, 1.0, 1.0);

        let partial = VcpCriteria::default().evaluate(&bars);
        assert!(partial.sma_long.is_some());
        assert!(partial.is_match());

        let strict = VcpCriteria {
            history_policy: HistoryPolicy::RequireFull,
            ..Default::default()
        }
        .evaluate(&bars);
        assert_eq!(strict.sma_long, None);
        assert!(strict.sma_short.is_some());
        assert!(!strict.is_match());
    }

    #[test]
    fn test_relative_threshold_scales_with_price() {
        // spread of 40 around a close near 5000: too wide in absolute terms
        let mut bars = trending(250, 5000.0, 2.0, 1.0);
        for (i, bar) in bars.iter_mut().enumerate() {
            let spread = if i % 2 == 0 { 1.0 } else { 40.0 };
            bar.high = bar.close + spread;
            bar.low = bar.close - spread;
        }

        assert!(!VcpCriteria::default().evaluate(&bars).is_match());

        let relative = VcpCriteria {
            threshold: ContractionThreshold::Relative(0.01),
            ..Default::default()
        };
        assert!(relative.evaluate(&bars).is_match());
    }

    #[test]
    fn test_sample_std_dev() {
        let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138_089_935).abs() < 1e-6);
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn test_criteria_validation() {
        assert!(VcpCriteria::default().validate().is_ok());

        let inverted = VcpCriteria {
            short_window: 200,
            long_window: 50,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let zero = VcpCriteria {
            recent_window: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let negative = VcpCriteria {
            threshold: ContractionThreshold::Absolute(-1.0),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_threshold_scale_flag() {
        assert!(ContractionThreshold::default().is_scale_dependent());
        assert!(!ContractionThreshold::Relative(0.02).is_scale_dependent());
        assert_eq!(ContractionThreshold::default().value(), 15.0);
    }
}
