//! Caching layer for price history so switching tabs does not refetch

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::MarketData;
use crate::error::Result;
use crate::series::PriceSeries;

/// Cache key for a history request, at day granularity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// First requested day
    pub start: NaiveDate,
    /// Last requested day
    pub end: NaiveDate,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            start: start.date_naive(),
            end: end.date_naive(),
        }
    }
}

/// Thread-safe timed cache of price series
#[derive(Clone)]
pub struct HistoryCache {
    cache: Arc<RwLock<TimedCache<CacheKey, PriceSeries>>>,
}

impl HistoryCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<PriceSeries> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: PriceSeries) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<PriceSeries>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<PriceSeries>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!("Cache hit for key: {:?}", key);
            return Ok(value);
        }

        tracing::debug!("Cache miss for key: {:?}", key);

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Market-data source that memoises history in a [`HistoryCache`]
pub struct CachedMarketData {
    inner: Arc<dyn MarketData>,
    cache: HistoryCache,
}

impl CachedMarketData {
    pub fn new(inner: Arc<dyn MarketData>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: HistoryCache::new(ttl),
        }
    }

    /// The underlying cache
    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }
}

#[async_trait]
impl MarketData for CachedMarketData {
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries> {
        let key = CacheKey::new(symbol, start, end);
        self.cache
            .get_or_fetch(key, || self.inner.daily_history(symbol, start, end))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::error::ScreenerError;
    use crate::series::fixtures::trending_series;
    use crate::series::trailing_window;

    #[test]
    fn test_cache_key_day_granularity() {
        let morning = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let later = morning + chrono::Duration::hours(1);
        let next_day = morning + chrono::Duration::days(1);

        let a = CacheKey::new("TCS.NS", morning, next_day);
        let b = CacheKey::new("TCS.NS", later, next_day);
        assert_eq!(a, b);
        assert_ne!(a, CacheKey::new("INFY.NS", morning, next_day));
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let (start, end) = trailing_window(30);
        let key = CacheKey::new("TCS.NS", start, end);
        let series = trending_series("TCS.NS", 10, 100.0, 1.0);

        cache.insert(key.clone(), series.clone()).await;
        assert_eq!(cache.get(&key).await, Some(series));
    }

    #[tokio::test]
    async fn test_cache_len() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let (start, end) = trailing_window(30);
        assert!(cache.is_empty().await);

        for symbol in ["TCS.NS", "INFY.NS", "RELIANCE.NS"] {
            let key = CacheKey::new(symbol, start, end);
            cache.insert(key, trending_series(symbol, 5, 10.0, 1.0)).await;
        }
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn test_cached_market_data_fetches_once() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history()
            .times(1)
            .returning(|symbol, _, _| Ok(trending_series(symbol, 20, 50.0, 1.0)));

        let market = CachedMarketData::new(Arc::new(mock), Duration::from_secs(60));
        let (start, end) = trailing_window(365);

        let first = market.daily_history("INFY.NS", start, end).await.unwrap();
        let second = market.daily_history("INFY.NS", start, end).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(market.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let mut mock = MockMarketData::new();
        mock.expect_daily_history()
            .times(2)
            .returning(|_, _, _| Err(ScreenerError::YahooFinanceError("down".to_string())));

        let market = CachedMarketData::new(Arc::new(mock), Duration::from_secs(60));
        let (start, end) = trailing_window(365);

        assert!(market.daily_history("TCS.NS", start, end).await.is_err());
        assert!(market.daily_history("TCS.NS", start, end).await.is_err());
        assert!(market.cache().is_empty().await);
    }
}
