//! Fixed ticker registry and sector labels

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Exchange suffixes stripped when building third-party page URLs
const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Sector label attached to a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Energy,
    Technology,
    Financials,
    Automotive,
}

impl Sector {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Energy => "Energy",
            Sector::Technology => "Technology",
            Sector::Financials => "Financials",
            Sector::Automotive => "Automotive",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub symbol: String,
    pub sector: Sector,
}

impl TickerEntry {
    pub fn new(symbol: impl Into<String>, sector: Sector) -> Self {
        Self {
            symbol: symbol.into(),
            sector,
        }
    }

    /// Symbol without the exchange suffix, e.g. `TCS` for `TCS.NS`
    pub fn base_symbol(&self) -> &str {
        base_symbol(&self.symbol)
    }
}

/// Strip a known exchange suffix from a symbol
pub fn base_symbol(symbol: &str) -> &str {
    EXCHANGE_SUFFIXES
        .iter()
        .find_map(|suffix| symbol.strip_suffix(suffix))
        .unwrap_or(symbol)
}

/// Ordered, immutable mapping from ticker symbol to sector
#[derive(Debug, Clone)]
pub struct TickerRegistry {
    entries: Vec<TickerEntry>,
}

impl TickerRegistry {
    /// Build a registry, rejecting empty input and duplicate symbols
    pub fn from_entries(entries: Vec<TickerEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ScreenerError::ConfigError(
                "Ticker registry must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.symbol.to_uppercase()) {
                return Err(ScreenerError::ConfigError(format!(
                    "Duplicate ticker in registry: {}",
                    entry.symbol
                )));
            }
        }

        Ok(Self { entries })
    }

    /// The five NSE tickers the dashboard screens by default
    pub fn nse_default() -> Self {
        Self {
            entries: vec![
                TickerEntry::new("RELIANCE.NS", Sector::Energy),
                TickerEntry::new("TCS.NS", Sector::Technology),
                TickerEntry::new("INFY.NS", Sector::Technology),
                TickerEntry::new("HDFCBANK.NS", Sector::Financials),
                TickerEntry::new("BAJAJ-AUTO.NS", Sector::Automotive),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    /// Exact symbol lookup
    pub fn get(&self, symbol: &str) -> Option<&TickerEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Sectors in first-seen registry order
    pub fn sectors(&self) -> Vec<Sector> {
        let mut sectors = Vec::new();
        for entry in &self.entries {
            if !sectors.contains(&entry.sector) {
                sectors.push(entry.sector);
            }
        }
        sectors
    }

    /// Resolve menu input to an entry.
    ///
    /// Accepts a 1-based index, the full symbol or the base symbol, ignoring case.
    pub fn resolve(&self, input: &str) -> Result<&TickerEntry> {
        let input = input.trim();

        if let Ok(index) = input.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.entries.get(i))
                .ok_or_else(|| ScreenerError::InvalidSymbol(input.to_string()));
        }

        let wanted = input.to_uppercase();
        self.entries
            .iter()
            .find(|e| e.symbol.to_uppercase() == wanted || e.base_symbol().to_uppercase() == wanted)
            .ok_or_else(|| ScreenerError::InvalidSymbol(input.to_string()))
    }
}

impl Default for TickerRegistry {
    fn default() -> Self {
        Self::nse_default()
    }
}
