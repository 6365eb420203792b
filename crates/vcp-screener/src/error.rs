//! Error types for screening and dashboard operations

use thiserror::Error;

/// Screener specific errors
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// Provider rejected the request in a way a retry will not fix
    #[error("API error: {0}")]
    ApiError(String),

    /// Symbol is not part of the ticker registry
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Remote page answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        status: u16,
        url: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Yahoo Finance request failed (connection, throttling, timeout)
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// HTML selector or page structure error
    #[error("Scrape error: {0}")]
    ScrapeError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Spreadsheet generation error
    #[error("Export error: {0}")]
    ExportError(#[from] rust_xlsxwriter::XlsxError),

    /// Export requested before any screening run
    #[error("Run the VCP screener first.")]
    NoScreeningResults,

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Menu command could not be parsed
    #[error("Command error: {0}")]
    CommandError(String),
}

impl ScreenerError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NetworkError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::YahooFinanceError(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for screener operations
pub type Result<T> = std::result::Result<T, ScreenerError>;
