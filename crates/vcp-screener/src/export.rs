//! Spreadsheet export of screening results

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::screening::ScreenReport;

/// Name of the single worksheet
pub const SHEET_NAME: &str = "VCP Screener";

/// Default download file name
pub const DEFAULT_FILE_NAME: &str = "vcp_screener.xlsx";

/// Column headers, in order
pub const HEADERS: [&str; 4] = ["Stock", "Sector", "Latest Close", "VCP Score"];

/// In-memory workbook ready to be saved
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl ExportArtifact {
    /// Write the workbook to `path`.
    ///
    /// A path with an extension names the file itself. Anything else is a
    /// directory, created when missing, that receives `file_name`.
    pub async fn save(&self, path: &Path) -> Result<PathBuf> {
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);

        let target = if is_dir {
            path.join(&self.file_name)
        } else if path.extension().is_some() {
            path.to_path_buf()
        } else {
            tokio::fs::create_dir_all(path).await?;
            path.join(&self.file_name)
        };

        tokio::fs::write(&target, &self.bytes).await?;
        info!("Exported {} rows to {}", self.rows, target.display());
        Ok(target)
    }
}

/// Build a one-sheet workbook from a screening report
pub fn export_report(report: &ScreenReport) -> Result<ExportArtifact> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let price = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in (0_u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, result) in (1_u32..).zip(&report.rows) {
        worksheet.write_string(row, 0, &result.symbol)?;
        worksheet.write_string(row, 1, result.sector.name())?;
        worksheet.write_number_with_format(row, 2, result.latest_close, &price)?;
        worksheet.write_string(row, 3, result.score_mark())?;
    }

    let bytes = workbook.save_to_buffer()?;

    Ok(ExportArtifact {
        file_name: DEFAULT_FILE_NAME.to_string(),
        bytes,
        rows: report.len(),
    })
}

#[cfg(test)]
pub(crate) mod workbook {
    use std::io::{Cursor, Read};

    /// One XML part of an xlsx package
    pub fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    /// Rows written to the first worksheet, header included
    pub fn sheet_rows(bytes: &[u8]) -> usize {
        part(bytes, "xl/worksheets/sheet1.xml").matches("<row ").count()
    }
}
