//! Volatility contraction pattern screener
//!
//! This crate backs a five-view terminal dashboard over a fixed list of NSE
//! tickers. It includes:
//!
//! - Daily history from Yahoo Finance with retry and a timed cache
//! - The VCP heuristic (range contraction plus moving-average breakout)
//! - Company ratios and news headlines scraped from finance sites
//! - Sector rotation by average closing price
//! - Export of the last screening report to an `.xlsx` workbook
//!
//! # Architecture
//!
//! Data sources sit behind two traits so the dashboard can run on fakes:
//! - `MarketData`: daily OHLC history (`YahooFinanceClient`, `CachedMarketData`)
//! - `PageFetcher`: raw HTML (`HttpPageFetcher`)
//!
//! `Dashboard` owns the session and dispatches each `Tab` to its view.
//!
//! # Example
//!
//! ```rust,ignore
//! use vcp_screener::{Dashboard, ScreenerConfig, Tab};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScreenerConfig::builder().with_env().build()?;
//!     let mut dashboard = Dashboard::from_config(config)?;
//!
//!     println!("{}", dashboard.run_tab(Tab::VcpScreener, None).await?);
//!     println!("{}", dashboard.run_tab(Tab::Export, None).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod registry;
pub mod scrape;
pub mod screening;
pub mod sector;
pub mod series;

// Re-export main types for convenience
pub use api::{HttpPageFetcher, MarketData, PageFetcher, RetryPolicy, YahooFinanceClient};
pub use cache::{CachedMarketData, HistoryCache};
pub use config::ScreenerConfig;
pub use dashboard::{Command, CommandOutcome, Dashboard, DashboardSession, Tab};
pub use error::{Result, ScreenerError};
pub use export::{ExportArtifact, export_report};
pub use registry::{Sector, TickerEntry, TickerRegistry};
pub use screening::{
    ContractionThreshold, HistoryPolicy, ScreenReport, ScreenResultRow, Screener, VcpAssessment,
    VcpCriteria, is_vcp,
};
pub use sector::SectorRotation;
pub use series::{Bar, PriceSeries};
