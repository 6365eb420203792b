//! Dashboard: tab dispatch over the screener, scrapers and export
//!
//! # Example
//!
//! ```rust,ignore
//! use vcp_screener::{Dashboard, ScreenerConfig, Tab};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut dashboard = Dashboard::from_config(ScreenerConfig::default())?;
//!     println!("{}", dashboard.run_tab(Tab::VcpScreener, None).await?);
//!     println!("{}", dashboard.run_tab(Tab::Export, None).await?);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod render;
pub mod session;
pub mod tab;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::{HttpPageFetcher, MarketData, PageFetcher, YahooFinanceClient};
use crate::cache::CachedMarketData;
use crate::config::ScreenerConfig;
use crate::error::{Result, ScreenerError};
use crate::export::{ExportArtifact, export_report};
use crate::registry::{TickerEntry, TickerRegistry};
use crate::scrape::{FundamentalsScraper, NewsScraper};
use crate::screening::{ScreenReport, Screener};
use crate::sector::SectorRotation;

pub use commands::Command;
pub use session::DashboardSession;
pub use tab::Tab;

/// What the menu loop should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Print the rendered view and keep going
    Render(String),
    /// Leave the dashboard
    Exit,
}

/// The five-view dashboard and its session
pub struct Dashboard {
    config: Arc<ScreenerConfig>,
    registry: TickerRegistry,
    market: Arc<dyn MarketData>,
    screener: Screener,
    fundamentals: FundamentalsScraper,
    news: NewsScraper,
    session: DashboardSession,
    export_dir: PathBuf,
}

impl Dashboard {
    /// Assemble a dashboard over the given data sources.
    ///
    /// Market data is wrapped in a timed history cache.
    pub fn new(
        config: ScreenerConfig,
        registry: TickerRegistry,
        market: Arc<dyn MarketData>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let config = Arc::new(config);
        let market: Arc<dyn MarketData> =
            Arc::new(CachedMarketData::new(market, config.cache_ttl_history));

        Self {
            screener: Screener::new(market.clone(), &config),
            fundamentals: FundamentalsScraper::new(fetcher.clone(), config.clone()),
            news: NewsScraper::new(fetcher, config.clone()),
            market,
            registry,
            config,
            session: DashboardSession::new(),
            export_dir: PathBuf::from("."),
        }
    }

    /// Live dashboard over Yahoo Finance and the scraped sites
    pub fn from_config(config: ScreenerConfig) -> Result<Self> {
        config.validate()?;
        let market = Arc::new(YahooFinanceClient::new(&config));
        let fetcher = Arc::new(HttpPageFetcher::new(&config)?);
        Ok(Self::new(config, TickerRegistry::nse_default(), market, fetcher))
    }

    /// Where exported workbooks are written
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    pub fn registry(&self) -> &TickerRegistry {
        &self.registry
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    /// Screen every ticker and keep the report for export
    pub async fn screen(&mut self) -> Result<&ScreenReport> {
        let report = self.screener.screen(&self.registry).await?;
        Ok(self.session.store_report(report))
    }

    pub async fn fundamentals(&self, ticker: &str) -> Result<(TickerEntry, String)> {
        let entry = self.registry.resolve(ticker)?.clone();
        let text = self.fundamentals.fetch_or_placeholder(&entry).await;
        Ok((entry, text))
    }

    pub async fn news(&self, ticker: &str) -> Result<(TickerEntry, Vec<String>)> {
        let entry = self.registry.resolve(ticker)?.clone();
        let headlines = self.news.headlines_or_placeholder(&entry).await;
        Ok((entry, headlines))
    }

    pub async fn sector_rotation(&self) -> Result<SectorRotation> {
        SectorRotation::compute(&self.market, &self.registry, &self.config).await
    }

    /// Workbook of the last screening report
    pub fn export(&self) -> Result<ExportArtifact> {
        let report = self
            .session
            .last_report()
            .ok_or(ScreenerError::NoScreeningResults)?;
        export_report(report)
    }

    /// Run one view and render it.
    ///
    /// Views that take a ticker default to the first registry entry.
    #[instrument(skip(self), fields(session = %self.session.id))]
    pub async fn run_tab(&mut self, tab: Tab, ticker: Option<&str>) -> Result<String> {
        self.session.update_activity();
        info!("Opening tab {}", tab);

        let default_ticker = self
            .registry
            .iter()
            .next()
            .map(|e| e.symbol.clone())
            .unwrap_or_default();
        let ticker = ticker.unwrap_or(default_ticker.as_str());

        match tab {
            Tab::VcpScreener => {
                let report = self.screen().await?;
                Ok(render::screen_report(report))
            }
            Tab::CompanyFundamentals => {
                let (entry, text) = self.fundamentals(ticker).await?;
                Ok(render::fundamentals(&entry.symbol, &text))
            }
            Tab::SectorRotation => {
                let rotation = self.sector_rotation().await?;
                Ok(render::sector_rotation(&rotation))
            }
            Tab::NewsAndEvents => {
                let (entry, headlines) = self.news(ticker).await?;
                Ok(render::news(&entry.symbol, &headlines))
            }
            Tab::Export => match self.export() {
                Ok(artifact) => {
                    let path = artifact.save(&self.export_dir).await?;
                    Ok(render::export_saved(&path, artifact.rows))
                }
                Err(e @ ScreenerError::NoScreeningResults) => {
                    Ok(render::export_unavailable(&e.to_string()))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Execute a parsed menu command
    pub async fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::Open { tab, ticker } => self
                .run_tab(tab, ticker.as_deref())
                .await
                .map(CommandOutcome::Render),
            Command::Tickers => Ok(CommandOutcome::Render(render::tickers(&self.registry))),
            Command::Help => Ok(CommandOutcome::Render(render::menu())),
            Command::Exit => Ok(CommandOutcome::Exit),
        }
    }

    /// Parse and execute a line of menu input
    pub async fn process_input(&mut self, input: &str) -> Result<CommandOutcome> {
        let command = Command::parse(input)?;
        self.execute(command).await
    }
}
