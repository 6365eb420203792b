//! Company ratios scraped from the fundamentals page

use scraper::Html;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::{normalize_text, selector};
use crate::api::PageFetcher;
use crate::config::ScreenerConfig;
use crate::error::Result;
use crate::registry::TickerEntry;

/// Container of the key ratios block
pub const RATIOS_SELECTOR: &str = ".company-ratios";

/// Shown when the page has no ratios block
pub const DATA_NOT_AVAILABLE: &str = "Data not available";

/// Shown when fetching or parsing fails
pub const FETCH_ERROR: &str = "Error fetching data";

pub struct FundamentalsScraper {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<ScreenerConfig>,
}

impl FundamentalsScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<ScreenerConfig>) -> Self {
        Self { fetcher, config }
    }

    /// Ratios text, or `None` when the page carries no ratios block
    #[instrument(skip_all, fields(symbol = %entry.symbol))]
    pub async fn fetch(&self, entry: &TickerEntry) -> Result<Option<String>> {
        let url = self.config.fundamentals_url_for(entry.base_symbol());
        let html = self.fetcher.fetch_page(&url).await?;
        parse_ratios(&html)
    }

    pub async fn fetch_or_placeholder(&self, entry: &TickerEntry) -> String {
        match self.fetch(entry).await {
            Ok(Some(text)) => text,
            Ok(None) => DATA_NOT_AVAILABLE.to_string(),
            Err(e) => {
                warn!("Fundamentals for {} unavailable: {}", entry.symbol, e);
                FETCH_ERROR.to_string()
            }
        }
    }
}

/// Extract the first ratios block from a fundamentals page
pub fn parse_ratios(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let ratios = selector(RATIOS_SELECTOR)?;

    Ok(document
        .select(&ratios)
        .next()
        .map(|element| normalize_text(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty()))
}
