//! Dashboard views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScreenerError};

/// One of the five dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    VcpScreener,
    CompanyFundamentals,
    SectorRotation,
    NewsAndEvents,
    Export,
}

impl Tab {
    /// Menu order
    pub const ALL: [Tab; 5] = [
        Tab::VcpScreener,
        Tab::CompanyFundamentals,
        Tab::SectorRotation,
        Tab::NewsAndEvents,
        Tab::Export,
    ];

    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Tab::VcpScreener => "VCP Screener",
            Tab::CompanyFundamentals => "Company Fundamentals",
            Tab::SectorRotation => "Sector Rotation",
            Tab::NewsAndEvents => "News & Events",
            Tab::Export => "Export",
        }
    }

    /// Heading shown above the view
    pub fn title(&self) -> &'static str {
        match self {
            Tab::VcpScreener => "VCP Screener",
            Tab::CompanyFundamentals => "Company Fundamentals",
            Tab::SectorRotation => "Sector Rotation Analysis",
            Tab::NewsAndEvents => "News & Events",
            Tab::Export => "Export Screener Results",
        }
    }

    /// 1-based menu position
    pub fn number(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).map_or(0, |i| i + 1)
    }

    /// Whether the view takes a ticker selection
    pub fn needs_ticker(&self) -> bool {
        matches!(self, Tab::CompanyFundamentals | Tab::NewsAndEvents)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();

        if let Ok(n) = key.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Tab::ALL.get(i).copied())
                .ok_or_else(|| ScreenerError::CommandError(format!("No tab numbered {n}")));
        }

        match key.as_str() {
            "screener" | "vcp" | "screen" | "s" | "vcp screener" => Ok(Tab::VcpScreener),
            "fundamentals" | "fund" | "f" | "company fundamentals" => {
                Ok(Tab::CompanyFundamentals)
            }
            "sector" | "sectors" | "rotation" | "r" | "sector rotation" => {
                Ok(Tab::SectorRotation)
            }
            "news" | "events" | "n" | "news & events" => Ok(Tab::NewsAndEvents),
            "export" | "x" => Ok(Tab::Export),
            _ => Err(ScreenerError::CommandError(format!("Unknown tab: {}", s.trim()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        let labels: Vec<_> = Tab::ALL.iter().map(Tab::label).collect();
        assert_eq!(
            labels,
            vec![
                "VCP Screener",
                "Company Fundamentals",
                "Sector Rotation",
                "News & Events",
                "Export"
            ]
        );
        assert_eq!(Tab::Export.number(), 5);
    }

    #[test]
    fn test_parse_tab() {
        assert_eq!("1".parse::<Tab>().unwrap(), Tab::VcpScreener);
        assert_eq!("News".parse::<Tab>().unwrap(), Tab::NewsAndEvents);
        assert_eq!("sector rotation".parse::<Tab>().unwrap(), Tab::SectorRotation);
        assert_eq!(" fund ".parse::<Tab>().unwrap(), Tab::CompanyFundamentals);
        assert!("0".parse::<Tab>().is_err());
        assert!("6".parse::<Tab>().is_err());
        assert!("charts".parse::<Tab>().is_err());
    }

    #[test]
    fn test_needs_ticker() {
        assert!(Tab::CompanyFundamentals.needs_ticker());
        assert!(Tab::NewsAndEvents.needs_ticker());
        assert!(!Tab::Export.needs_ticker());
    }
}
