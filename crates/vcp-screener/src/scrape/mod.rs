//! CSS-selector scrapers for the fundamentals and news pages
//!
//! Both scrapers return `Result` internally; the `*_or_placeholder` methods
//! collapse any failure into the fixed text the dashboard shows, logging the
//! real cause.

pub mod fundamentals;
pub mod news;

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

use crate::error::{Result, ScreenerError};

pub use fundamentals::FundamentalsScraper;
pub use news::NewsScraper;

static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid whitespace pattern"));

/// Compile a CSS selector
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScreenerError::ScrapeError(format!("{css}: {e}")))
}

/// Trim every line, squeeze inner whitespace and drop blank lines
pub fn normalize_text(raw: &str) -> String {
    raw.lines()
        .map(|line| INLINE_WHITESPACE.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        let raw = "\n   Market Cap \n\n   ₹ 12,34,567   Cr.\t\t\n  \n Stock P/E   25.3 ";
        assert_eq!(normalize_text(raw), "Market Cap\n₹ 12,34,567 Cr.\nStock P/E 25.3");
        assert_eq!(normalize_text("   \n\t\n"), "");
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(selector("h2[["), Err(ScreenerError::ScrapeError(_))));
        assert!(selector(".clearfix h2").is_ok());
    }
}
