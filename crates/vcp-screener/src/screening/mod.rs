//! VCP screening over the ticker registry

pub mod vcp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::api::MarketData;
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::registry::{Sector, TickerEntry, TickerRegistry};
use crate::series::{PriceSeries, trailing_window};

pub use vcp::{ContractionThreshold, HistoryPolicy, VcpAssessment, VcpCriteria, is_vcp};

/// Mark shown in the score column for matching tickers
pub const MATCH_MARK: &str = "✔";

/// One screening result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResultRow {
    pub symbol: String,
    pub sector: Sector,
    pub latest_close: f64,
    pub flagged: bool,
}

impl ScreenResultRow {
    pub fn score_mark(&self) -> &'static str {
        if self.flagged { MATCH_MARK } else { "" }
    }
}

/// Outcome of one screening run; `rows` holds flagged tickers only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub rows: Vec<ScreenResultRow>,
    pub evaluated: usize,
    pub generated_at: DateTime<Utc>,
}

impl ScreenReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Runs the heuristic over every registry ticker
pub struct Screener {
    market: Arc<dyn MarketData>,
    criteria: VcpCriteria,
    history_days: u32,
}

impl Screener {
    pub fn new(market: Arc<dyn MarketData>, config: &ScreenerConfig) -> Self {
        Self {
            market,
            criteria: config.criteria,
            history_days: config.history_days,
        }
    }

    /// Fetch one ticker's history and assess it
    pub async fn assess(&self, symbol: &str) -> Result<(PriceSeries, VcpAssessment)> {
        let (start, end) = trailing_window(self.history_days);
        let series = self.market.daily_history(symbol, start, end).await?;
        let assessment = self.criteria.evaluate(&series.bars);
        Ok((series, assessment))
    }

    /// Screen tickers one at a time, in registry order.
    ///
    /// The first market-data failure aborts the run.
    #[instrument(skip_all, fields(tickers = registry.len()))]
    pub async fn screen(&self, registry: &TickerRegistry) -> Result<ScreenReport> {
        let mut rows = Vec::new();

        for entry in registry.iter() {
            let (series, assessment) = self.assess(&entry.symbol).await?;
            debug!(
                symbol = %entry.symbol,
                observations = assessment.observations,
                range_std = ?assessment.range_std,
                sma_short = ?assessment.sma_short,
                sma_long = ?assessment.sma_long,
                contracted = assessment.contracted,
                breakout = assessment.breakout,
                "Assessed ticker"
            );

            if let Some(row) = flagged_row(entry, &series, &assessment) {
                rows.push(row);
            }
        }

        info!("Screening finished: {} of {} tickers flagged", rows.len(), registry.len());

        Ok(ScreenReport {
            rows,
            evaluated: registry.len(),
            generated_at: Utc::now(),
        })
    }
}

fn flagged_row(
    entry: &TickerEntry,
    series: &PriceSeries,
    assessment: &VcpAssessment,
) -> Option<ScreenResultRow> {
    if !assessment.is_match() {
        return None;
    }

    Some(ScreenResultRow {
        symbol: entry.symbol.clone(),
        sector: entry.sector,
        latest_close: series.last_close()?,
        flagged: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::error::ScreenerError;
    use crate::series::fixtures::trending_series;

    fn market_with(uptrending: &'static [&'static str]) -> MockMarketData {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history().returning(move |symbol, _, _| {
            if uptrending.iter().any(|s| *s == symbol) {
                Ok(trending_series(symbol, 250, 100.0, 1.0))
            } else {
                Ok(trending_series(symbol, 250, 400.0, -1.0))
            }
        });
        mock
    }

    #[tokio::test]
    async fn test_screen_flags_matching_tickers() {
        let market = market_with(&["TCS.NS", "HDFCBANK.NS"]);
        let screener = Screener::new(Arc::new(market), &ScreenerConfig::default());

        let report = screener.screen(&TickerRegistry::nse_default()).await.unwrap();

        assert_eq!(report.evaluated, 5);
        assert_eq!(report.len(), 2);
        assert_eq!(report.rows[0].symbol, "TCS.NS");
        assert_eq!(report.rows[0].sector, Sector::Technology);
        assert_eq!(report.rows[0].latest_close, 349.0);
        assert_eq!(report.rows[0].score_mark(), MATCH_MARK);
        assert_eq!(report.rows[1].symbol, "HDFCBANK.NS");
    }

    #[tokio::test]
    async fn test_screen_with_no_matches() {
        let screener = Screener::new(Arc::new(market_with(&[])), &ScreenerConfig::default());
        let report = screener.screen(&TickerRegistry::nse_default()).await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.evaluated, 5);
    }

    #[tokio::test]
    async fn test_empty_history_is_not_flagged() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history()
            .returning(|symbol, _, _| Ok(PriceSeries::new(symbol, Vec::new())));

        let screener = Screener::new(Arc::new(mock), &ScreenerConfig::default());
        let report = screener.screen(&TickerRegistry::nse_default()).await.unwrap();
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_market_failure_propagates() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history()
            .times(1)
            .returning(|_, _, _| Err(ScreenerError::YahooFinanceError("No data".to_string())));

        let screener = Screener::new(Arc::new(mock), &ScreenerConfig::default());
        let result = screener.screen(&TickerRegistry::nse_default()).await;
        assert!(matches!(result, Err(ScreenerError::YahooFinanceError(_))));
    }

    #[tokio::test]
    async fn test_assess_single_ticker() {
        let screener = Screener::new(
            Arc::new(market_with(&["INFY.NS"])),
            &ScreenerConfig::default(),
        );
        let (series, assessment) = screener.assess("INFY.NS").await.unwrap();
        assert_eq!(series.len(), 250);
        assert!(assessment.is_match());
    }
}
