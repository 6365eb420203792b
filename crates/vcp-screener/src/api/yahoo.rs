//! Yahoo Finance market-data client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

use super::MarketData;
use super::retry::RetryPolicy;
use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};
use crate::series::{Bar, PriceSeries};

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(config: &ScreenerConfig) -> Self {
        Self {
            retry: RetryPolicy::from_config(config),
            request_timeout: config.request_timeout,
        }
    }

    async fn fetch_once(
        &self,
        symbol: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Bar>> {
        let provider = yahoo::YahooConnector::new().map_err(|e| classify_error(symbol, e))?;

        let response =
            tokio::time::timeout(self.request_timeout, provider.get_quote_history(symbol, start, end))
                .await
                .map_err(|_| {
                    ScreenerError::YahooFinanceError(format!(
                        "request for {symbol} timed out after {:?}",
                        self.request_timeout
                    ))
                })?
                .map_err(|e| classify_error(symbol, e))?;

        let quotes = response.quotes().map_err(|e| classify_error(symbol, e))?;

        Ok(quotes
            .iter()
            .map(|q| Bar {
                timestamp: DateTime::from_timestamp(q.timestamp, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }
}

/// Map a provider error onto retryable and permanent failures.
///
/// Connection problems, throttling and cookie/crumb hiccups are retried with a
/// fresh connector. Empty or undecodable answers mean the symbol has no data.
fn classify_error(symbol: &str, err: yahoo::YahooError) -> ScreenerError {
    use yahoo::YahooError as Y;

    match err {
        Y::ConnectionFailed(e) => ScreenerError::YahooFinanceError(e.to_string()),
        e @ (Y::FetchFailed(_)
        | Y::TooManyRequests(_)
        | Y::NoResponse
        | Y::NoCookies
        | Y::InvisibleAsciiInCookies
        | Y::InvalidCookie
        | Y::InvalidCrumb
        | Y::Unauthorized) => ScreenerError::YahooFinanceError(e.to_string()),
        Y::ApiError(message) => ScreenerError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: message
                .description
                .or(message.code)
                .unwrap_or_else(|| "rejected by provider".to_string()),
        },
        e @ (Y::NoResult
        | Y::NoQuotes
        | Y::DataInconsistency
        | Y::DeserializeFailed(_)
        | Y::DeserializeFailedDebug(_)
        | Y::MissingField(_)) => ScreenerError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        },
        e => ScreenerError::ApiError(e.to_string()),
    }
}

#[async_trait]
impl MarketData for YahooFinanceClient {
    #[instrument(skip(self), fields(provider = "yahoo"))]
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            ScreenerError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(|e| {
            ScreenerError::YahooFinanceError(format!("Invalid end timestamp: {e}"))
        })?;

        let bars = self
            .retry
            .execute(&format!("yahoo history {symbol}"), || {
                self.fetch_once(symbol, start_odt, end_odt)
            })
            .await?;

        debug!("Fetched {} daily bars for {}", bars.len(), symbol);
        Ok(PriceSeries::new(symbol, bars))
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(&ScreenerConfig::default())
    }
}
