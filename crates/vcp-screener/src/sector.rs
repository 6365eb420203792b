//! Sector rotation: average closing price levels per sector
//!
//! Each ticker contributes the mean close of its history window; a sector's
//! level is the mean over its tickers. Sectors keep registry order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::MarketData;
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::registry::{Sector, TickerRegistry};
use crate::series::trailing_window;

/// Mean close of one ticker over the history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerAverage {
    pub symbol: String,
    pub sector: Sector,
    pub avg_close: f64,
}

/// Aggregated level of one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAverage {
    pub sector: Sector,
    pub avg_close: f64,
    pub tickers: Vec<String>,
}

/// Result of a rotation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorRotation {
    pub tickers: Vec<TickerAverage>,
    pub sectors: Vec<SectorAverage>,
}

impl SectorRotation {
    /// Fetch every ticker's history in turn and aggregate by sector.
    ///
    /// Tickers with no bars are skipped; fetch failures propagate.
    pub async fn compute(
        market: &Arc<dyn MarketData>,
        registry: &TickerRegistry,
        config: &ScreenerConfig,
    ) -> Result<Self> {
        let (start, end) = trailing_window(config.history_days);
        let mut tickers = Vec::with_capacity(registry.len());

        for entry in registry.iter() {
            let series = market.daily_history(&entry.symbol, start, end).await?;
            match series.mean_close() {
                Some(avg_close) => tickers.push(TickerAverage {
                    symbol: entry.symbol.clone(),
                    sector: entry.sector,
                    avg_close,
                }),
                None => warn!("No history for {}, left out of sector rotation", entry.symbol),
            }
        }

        let rotation = Self::from_ticker_averages(tickers, &registry.sectors());
        info!("Sector rotation computed for {} sectors", rotation.sectors.len());
        Ok(rotation)
    }

    /// Group ticker averages by sector, following `order`
    pub fn from_ticker_averages(tickers: Vec<TickerAverage>, order: &[Sector]) -> Self {
        let sectors = order
            .iter()
            .filter_map(|&sector| {
                let members: Vec<&TickerAverage> =
                    tickers.iter().filter(|t| t.sector == sector).collect();
                if members.is_empty() {
                    return None;
                }

                let avg_close =
                    members.iter().map(|t| t.avg_close).sum::<f64>() / members.len() as f64;
                Some(SectorAverage {
                    sector,
                    avg_close,
                    tickers: members.iter().map(|t| t.symbol.clone()).collect(),
                })
            })
            .collect();

        Self { tickers, sectors }
    }

    /// Highest sector level, used to scale the bar chart
    pub fn max_level(&self) -> Option<f64> {
        self.sectors.iter().map(|s| s.avg_close).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::error::ScreenerError;
    use crate::series::PriceSeries;
    use crate::series::fixtures::trending_series;

    #[tokio::test]
    async fn test_rotation_groups_by_sector() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history().returning(|symbol, _, _| {
            let base = match symbol {
                "RELIANCE.NS" => 2_900.0,
                "TCS.NS" => 3_800.0,
                "INFY.NS" => 1_600.0,
                "HDFCBANK.NS" => 1_700.0,
                _ => 9_000.0,
            };
            // closes base-1, base, base+1 -> mean base
            Ok(trending_series(symbol, 3, base - 1.0, 1.0))
        });
        let market: Arc<dyn MarketData> = Arc::new(mock);

        let rotation = SectorRotation::compute(
            &market,
            &TickerRegistry::nse_default(),
            &ScreenerConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(rotation.tickers.len(), 5);
        let sectors: Vec<Sector> = rotation.sectors.iter().map(|s| s.sector).collect();
        assert_eq!(
            sectors,
            vec![
                Sector::Energy,
                Sector::Technology,
                Sector::Financials,
                Sector::Automotive
            ]
        );

        let tech = &rotation.sectors[1];
        assert_eq!(tech.tickers, vec!["TCS.NS", "INFY.NS"]);
        assert!((tech.avg_close - 2_700.0).abs() < 1e-9);
        assert_eq!(rotation.max_level(), Some(9_000.0));
    }

    #[tokio::test]
    async fn test_empty_series_skipped() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history().returning(|symbol, _, _| {
            if symbol == "RELIANCE.NS" {
                Ok(PriceSeries::new(symbol, Vec::new()))
            } else {
                Ok(trending_series(symbol, 3, 99.0, 1.0))
            }
        });
        let market: Arc<dyn MarketData> = Arc::new(mock);

        let rotation = SectorRotation::compute(
            &market,
            &TickerRegistry::nse_default(),
            &ScreenerConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(rotation.tickers.len(), 4);
        assert!(rotation.sectors.iter().all(|s| s.sector != Sector::Energy));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history()
            .returning(|_, _, _| Err(ScreenerError::YahooFinanceError("down".to_string())));
        let market: Arc<dyn MarketData> = Arc::new(mock);

        let result = SectorRotation::compute(
            &market,
            &TickerRegistry::nse_default(),
            &ScreenerConfig::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_max_level_empty() {
        assert_eq!(SectorRotation::default().max_level(), None);
    }
}
