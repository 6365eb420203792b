//! Terminal rendering for dashboard views

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use std::path::Path;

use super::tab::Tab;
use crate::registry::TickerRegistry;
use crate::screening::ScreenReport;
use crate::sector::SectorRotation;

/// Width of the longest bar in the sector chart
const BAR_WIDTH: usize = 40;

const NO_PATTERNS: &str = "No VCP patterns detected today.";
const NO_HEADLINES: &str = "No headlines found.";

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Underlined view heading
pub fn heading(text: &str) -> String {
    format!("{text}\n{}", "=".repeat(text.chars().count()))
}

pub fn subheading(text: &str) -> String {
    format!("{text}\n{}", "-".repeat(text.chars().count()))
}

pub fn warning(message: &str) -> String {
    format!("⚠ {message}")
}

pub fn banner() -> String {
    heading("VCP Screener Dashboard")
}

/// Numbered tab list
pub fn menu() -> String {
    let mut out = String::from("Select Dashboard Tab\n");
    for tab in Tab::ALL {
        let hint = if tab.needs_ticker() { " [ticker]" } else { "" };
        out.push_str(&format!("  {}. {}{}\n", tab.number(), tab.label(), hint));
    }
    out.push_str("  tickers | help | exit");
    out
}

/// Numbered registry listing for ticker selection
pub fn tickers(registry: &TickerRegistry) -> String {
    let mut table = table();
    table.set_header(vec!["#", "Stock", "Sector"]);
    for (i, entry) in registry.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), entry.symbol.clone(), entry.sector.to_string()]);
    }
    table.to_string()
}

pub fn screen_report(report: &ScreenReport) -> String {
    let mut out = heading(Tab::VcpScreener.title());
    out.push('\n');

    if report.is_empty() {
        out.push_str(&warning(NO_PATTERNS));
        return out;
    }

    let mut table = table();
    table.set_header(vec!["Stock", "Sector", "Latest Close", "VCP Score"]);
    for row in &report.rows {
        table.add_row(vec![
            row.symbol.clone(),
            row.sector.to_string(),
            format!("{:.2}", row.latest_close),
            row.score_mark().to_string(),
        ]);
    }
    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    out.push_str(&table.to_string());
    out.push_str(&format!(
        "\n{} of {} tickers flagged",
        report.len(),
        report.evaluated
    ));
    out
}

pub fn fundamentals(symbol: &str, text: &str) -> String {
    format!(
        "{}\n{}\n{}",
        heading(Tab::CompanyFundamentals.title()),
        subheading(&format!("Fundamentals for {symbol}")),
        text
    )
}

/// Horizontal bar chart of sector levels
pub fn sector_rotation(rotation: &SectorRotation) -> String {
    let mut out = heading(Tab::SectorRotation.title());
    out.push('\n');

    let Some(max) = rotation.max_level().filter(|m| *m > 0.0) else {
        out.push_str(&warning("No price history available."));
        return out;
    };

    let label_width = rotation
        .sectors
        .iter()
        .map(|s| s.sector.name().len())
        .max()
        .unwrap_or(0);

    for sector in &rotation.sectors {
        let len = ((sector.avg_close / max) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "{:<label_width$} │{} {:.2}\n",
            sector.sector.name(),
            "█".repeat(len.max(1)),
            sector.avg_close
        ));
    }

    let mut table = table();
    table.set_header(vec!["Stock", "Sector", "Avg Close"]);
    for ticker in &rotation.tickers {
        table.add_row(vec![
            ticker.symbol.clone(),
            ticker.sector.to_string(),
            format!("{:.2}", ticker.avg_close),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn news(symbol: &str, headlines: &[String]) -> String {
    let mut out = format!(
        "{}\n{}\n",
        heading(Tab::NewsAndEvents.title()),
        subheading(&format!("Recent headlines for {symbol}"))
    );

    if headlines.is_empty() {
        out.push_str(NO_HEADLINES);
        return out;
    }

    let lines: Vec<String> = headlines.iter().map(|h| format!("- {h}")).collect();
    out.push_str(&lines.join("\n"));
    out
}

pub fn export_saved(path: &Path, rows: usize) -> String {
    format!(
        "{}\nSaved {rows} row(s) to {}",
        heading(Tab::Export.title()),
        path.display()
    )
}

pub fn export_unavailable(message: &str) -> String {
    format!("{}\n{}", heading(Tab::Export.title()), warning(message))
}
