//! Clients for the market-data provider and the scraped finance sites

pub mod http;
pub mod retry;
pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::series::PriceSeries;

pub use http::HttpPageFetcher;
pub use retry::RetryPolicy;
pub use yahoo::YahooFinanceClient;

/// Source of daily OHLC history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily bars for `symbol` between `start` and `end`
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries>;
}

/// Fetches raw HTML pages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of the page at `url`; non-success statuses are errors
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
