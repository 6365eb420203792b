//! Headlines scraped from the news tag page

use scraper::Html;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::selector;
use crate::api::PageFetcher;
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::registry::TickerEntry;

/// Headline elements on the tag page
pub const HEADLINE_SELECTOR: &str = ".clearfix h2";

/// Single headline shown when fetching or parsing fails
pub const NO_NEWS: &str = "No news available";

pub struct NewsScraper {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<ScreenerConfig>,
}

impl NewsScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<ScreenerConfig>) -> Self {
        Self { fetcher, config }
    }

    #[instrument(skip_all, fields(symbol = %entry.symbol))]
    pub async fn headlines(&self, entry: &TickerEntry) -> Result<Vec<String>> {
        let url = self.config.news_url_for(entry.base_symbol());
        let html = self.fetcher.fetch_page(&url).await?;
        parse_headlines(&html, self.config.news_limit)
    }

    pub async fn headlines_or_placeholder(&self, entry: &TickerEntry) -> Vec<String> {
        self.headlines(entry).await.unwrap_or_else(|e| {
            warn!("News for {} unavailable: {}", entry.symbol, e);
            vec![NO_NEWS.to_string()]
        })
    }
}

/// Text of the first `limit` headline elements.
///
/// Each text node is stripped and the pieces are concatenated without a
/// separator.
pub fn parse_headlines(html: &str, limit: usize) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let headline = selector(HEADLINE_SELECTOR)?;

    Ok(document
        .select(&headline)
        .take(limit)
        .map(|element| element.text().map(str::trim).collect::<String>())
        .collect())
}
