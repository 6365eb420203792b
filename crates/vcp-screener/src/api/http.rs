//! HTML page fetcher for the scraped finance sites

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::PageFetcher;
use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Rate-limited HTTP client that sends a browser user-agent
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    rate_limiter: SharedRateLimiter,
}

impl HttpPageFetcher {
    /// Create a fetcher from the screener configuration
    ///
    /// # Arguments
    /// * `config` - supplies the user-agent, request timeout and requests per minute
    pub fn new(config: &ScreenerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ScreenerError::ConfigError(format!("Invalid user agent: {e}")))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let per_minute = NonZeroU32::new(config.scrape_rate_limit).ok_or_else(|| {
            ScreenerError::ConfigError("scrape_rate_limit must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            client,
            rate_limiter,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    #[instrument(skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScreenerError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let config = ScreenerConfig::default();
        assert!(HttpPageFetcher::new(&config).is_ok());
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let config = ScreenerConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpPageFetcher::new(&config),
            Err(ScreenerError::ConfigError(_))
        ));
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let config = ScreenerConfig {
            scrape_rate_limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            HttpPageFetcher::new(&config),
            Err(ScreenerError::ConfigError(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_page() {
        let fetcher = HttpPageFetcher::new(&ScreenerConfig::default()).unwrap();
        let body = fetcher.fetch_page("https://www.screener.in/company/TCS/").await.unwrap();
        assert!(body.contains("company-ratios"));
    }
}
