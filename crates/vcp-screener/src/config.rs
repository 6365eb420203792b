//! Configuration for screening, scraping and export

use crate::error::{Result, ScreenerError};
use crate::screening::{ContractionThreshold, HistoryPolicy, VcpCriteria};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder substituted with the base symbol in page URL templates
pub const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// Configuration for the dashboard's data sources and heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Days of daily history fetched per ticker
    pub history_days: u32,

    /// VCP heuristic parameters
    pub criteria: VcpCriteria,

    /// User-agent sent to the scraped sites
    pub user_agent: String,

    /// Fundamentals page template
    pub fundamentals_url: String,

    /// News tag page template
    pub news_url: String,

    /// Maximum headlines shown per ticker
    pub news_limit: usize,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum number of attempts for market-data calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Scrape requests allowed per minute
    pub scrape_rate_limit: u32,

    /// Cache TTL for fetched price history
    pub cache_ttl_history: Duration,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            history_days: 365,
            criteria: VcpCriteria::default(),
            user_agent: "Mozilla/5.0".to_string(),
            fundamentals_url: "https://www.screener.in/company/{symbol}/".to_string(),
            news_url: "https://www.moneycontrol.com/news/tags/{symbol}.html".to_string(),
            news_limit: 5,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            scrape_rate_limit: 30,
            cache_ttl_history: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl ScreenerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.criteria.validate()?;

        if self.history_days == 0 {
            return Err(ScreenerError::ConfigError(
                "history_days must be greater than 0".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(ScreenerError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ScreenerError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.scrape_rate_limit == 0 {
            return Err(ScreenerError::ConfigError(
                "scrape_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.news_limit == 0 {
            return Err(ScreenerError::ConfigError(
                "news_limit must be greater than 0".to_string(),
            ));
        }

        for (name, template) in [
            ("fundamentals_url", &self.fundamentals_url),
            ("news_url", &self.news_url),
        ] {
            if !template.contains(SYMBOL_PLACEHOLDER) {
                return Err(ScreenerError::ConfigError(format!(
                    "{name} must contain {SYMBOL_PLACEHOLDER}"
                )));
            }
        }

        Ok(())
    }

    /// Fundamentals page for a base symbol
    pub fn fundamentals_url_for(&self, base_symbol: &str) -> String {
        self.fundamentals_url.replace(SYMBOL_PLACEHOLDER, base_symbol)
    }

    /// News tag page for a base symbol
    pub fn news_url_for(&self, base_symbol: &str) -> String {
        self.news_url.replace(SYMBOL_PLACEHOLDER, base_symbol)
    }
}

/// Builder for ScreenerConfig
#[derive(Debug, Default)]
pub struct ScreenerConfigBuilder {
    history_days: Option<u32>,
    threshold: Option<ContractionThreshold>,
    history_policy: Option<HistoryPolicy>,
    user_agent: Option<String>,
    fundamentals_url: Option<String>,
    news_url: Option<String>,
    news_limit: Option<usize>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    scrape_rate_limit: Option<u32>,
    cache_ttl_history: Option<Duration>,
}

impl ScreenerConfigBuilder {
    /// Set days of history per ticker
    pub fn history_days(mut self, days: u32) -> Self {
        self.history_days = Some(days);
        self
    }

    /// Set the contraction threshold
    pub fn threshold(mut self, threshold: ContractionThreshold) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the short-history policy for moving averages
    pub fn history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.history_policy = Some(policy);
        self
    }

    /// Set the scraping user-agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the fundamentals URL template
    pub fn fundamentals_url(mut self, template: impl Into<String>) -> Self {
        self.fundamentals_url = Some(template.into());
        self
    }

    /// Set the news URL template
    pub fn news_url(mut self, template: impl Into<String>) -> Self {
        self.news_url = Some(template.into());
        self
    }

    /// Set maximum headlines per ticker
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set scrape requests per minute
    pub fn scrape_rate_limit(mut self, per_minute: u32) -> Self {
        self.scrape_rate_limit = Some(per_minute);
        self
    }

    /// Set history cache TTL
    pub fn cache_ttl_history(mut self, duration: Duration) -> Self {
        self.cache_ttl_history = Some(duration);
        self
    }

    /// Load overrides from `VCP_*` environment variables
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Load `VCP_*` overrides through `lookup`.
    ///
    /// Unparseable values are ignored. `VCP_RELATIVE_THRESHOLD` wins over
    /// `VCP_CONTRACTION_THRESHOLD` when both are set.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |name: &str| lookup(name).and_then(|v| v.trim().parse::<f64>().ok());
        let parsed_u64 = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(days) = parsed_u64("VCP_HISTORY_DAYS").and_then(|d| u32::try_from(d).ok()) {
            self.history_days = Some(days);
        }
        if let Some(limit) = parsed("VCP_CONTRACTION_THRESHOLD") {
            self.threshold = Some(ContractionThreshold::Absolute(limit));
        }
        if let Some(fraction) = parsed("VCP_RELATIVE_THRESHOLD") {
            self.threshold = Some(ContractionThreshold::Relative(fraction));
        }
        if let Some(agent) = lookup("VCP_USER_AGENT") {
            self.user_agent = Some(agent);
        }
        if let Some(secs) = parsed_u64("VCP_REQUEST_TIMEOUT_SECS") {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ScreenerConfig> {
        let defaults = ScreenerConfig::default();

        let criteria = VcpCriteria {
            threshold: self.threshold.unwrap_or(defaults.criteria.threshold),
            history_policy: self.history_policy.unwrap_or(defaults.criteria.history_policy),
            ..defaults.criteria
        };

        let config = ScreenerConfig {
            history_days: self.history_days.unwrap_or(defaults.history_days),
            criteria,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            fundamentals_url: self.fundamentals_url.unwrap_or(defaults.fundamentals_url),
            news_url: self.news_url.unwrap_or(defaults.news_url),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            scrape_rate_limit: self.scrape_rate_limit.unwrap_or(defaults.scrape_rate_limit),
            cache_ttl_history: self.cache_ttl_history.unwrap_or(defaults.cache_ttl_history),
        };

        config.validate()?;
        Ok(config)
    }
}
