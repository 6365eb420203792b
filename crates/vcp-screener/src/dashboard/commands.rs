//! Command parsing for the interactive menu

use super::tab::Tab;
use crate::error::{Result, ScreenerError};

/// Parsed menu input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open a tab, optionally with a ticker selection
    Open { tab: Tab, ticker: Option<String> },
    /// List the ticker registry
    Tickers,
    /// Show the menu
    Help,
    /// Leave the dashboard
    Exit,
}

impl Command {
    /// Parse a command from user input.
    ///
    /// A leading `/` is optional. The leading words select a control command
    /// or a tab, by number, alias or full label; a trailing word is the ticker.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);

        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return Err(ScreenerError::CommandError("Empty command".to_string()));
        };

        match first.to_lowercase().as_str() {
            "help" | "h" | "?" | "menu" => return Ok(Command::Help),
            "exit" | "quit" | "q" => return Ok(Command::Exit),
            "tickers" | "list" | "ls" => return Ok(Command::Tickers),
            _ => {}
        }

        let (tab, args) = split_tab(&parts)?;
        if args.len() > 1 {
            return Err(ScreenerError::CommandError(format!(
                "Too many arguments for {tab}"
            )));
        }
        if !tab.needs_ticker() && !args.is_empty() {
            return Err(ScreenerError::CommandError(format!(
                "{tab} does not take a ticker"
            )));
        }

        Ok(Command::Open {
            tab,
            ticker: args.first().map(|s| (*s).to_string()),
        })
    }
}

/// Longest run of leading words naming a tab, and the words after it
fn split_tab<'a, 'b>(parts: &'a [&'b str]) -> Result<(Tab, &'a [&'b str])> {
    for n in (2..=parts.len()).rev() {
        if let Ok(tab) = parts[..n].join(" ").parse::<Tab>() {
            return Ok((tab, &parts[n..]));
        }
    }

    let tab = parts.first().copied().unwrap_or_default().parse::<Tab>()?;
    Ok((tab, parts.get(1..).unwrap_or_default()))
}
