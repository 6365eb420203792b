//! Daily price series

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLC bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl Bar {
    /// Daily high-low range
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Time-ordered daily bars for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create a series, ordering bars by timestamp
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Most recent close
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Mean close over the whole series
    pub fn mean_close(&self) -> Option<f64> {
        if self.bars.is_empty() {
            return None;
        }
        Some(self.bars.iter().map(|b| b.close).sum::<f64>() / self.bars.len() as f64)
    }
}

/// Start and end of a history window ending now
pub fn trailing_window(days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = Utc::now();
    (end - Duration::days(i64::from(days)), end)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Bars with a linear close trend and a constant high-low spread
    pub fn trending(len: usize, start: f64, step: f64, half_range: f64) -> Vec<Bar> {
        let origin = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_else(Utc::now);
        (0..len)
            .map(|i| {
                let close = start + step * i as f64;
                Bar {
                    timestamp: origin + Duration::days(i as i64),
                    open: close,
                    high: close + half_range,
                    low: close - half_range,
                    close,
                    volume: 1_000,
                    adjclose: close,
                }
            })
            .collect()
    }

    pub fn trending_series(symbol: &str, len: usize, start: f64, step: f64) -> PriceSeries {
        PriceSeries::new(symbol, trending(len, start, step, 1.0))
    }
}
