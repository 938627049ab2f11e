use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, Utc};
use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::{AppError, Result};
use crate::models::ScrapedRecord;

pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Scraped Data";
const HEADERS: [&str; 5] = ["Title", "Category", "Price", "Link", "Captured At"];
const COLUMN_WIDTHS: [f64; 5] = [40.0, 20.0, 15.0, 50.0, 25.0];

/// Builds the single-sheet workbook in memory: header row, then one row per
/// record in the fixed column order.
pub fn build_workbook(records: &[ScrapedRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &bold)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write(row, 0, record.title.as_str())?;
        sheet.write(row, 1, record.category.as_deref().unwrap_or("N/A"))?;
        let price = record
            .price
            .as_ref()
            .map(|p| p.display())
            .unwrap_or_else(|| "-".to_string());
        sheet.write(row, 2, price)?;
        sheet.write(row, 3, record.link.as_str())?;
        sheet.write(row, 4, capture_time(record.timestamp.as_deref()))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Writes the workbook for `records` under `dir`, named with a millisecond
/// timestamp to avoid collisions. An empty record list is a no-op.
pub fn export_local(records: &[ScrapedRecord], dir: &Path) -> Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    let bytes = build_workbook(records)?;
    let path = dir.join(export_file_name());
    std::fs::write(&path, bytes)?;
    info!("Exported {} records to {}", records.len(), path.display());
    Ok(Some(path))
}

/// Decodes a spreadsheet the endpoint produced server-side and writes it
/// verbatim, without re-deriving it from the record list.
pub fn export_remote(base64_payload: &str, file_name: &str, dir: &Path) -> Result<PathBuf> {
    let bytes = STANDARD
        .decode(base64_payload)
        .map_err(|e| AppError::ParseError(format!("Invalid base64 spreadsheet payload: {}", e)))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    info!("Saved remote spreadsheet to {}", path.display());
    Ok(path)
}

pub fn export_file_name() -> String {
    format!("scrape_export_{}.xlsx", Utc::now().timestamp_millis())
}

/// Record timestamp when parseable, time of export otherwise.
fn capture_time(raw: Option<&str>) -> String {
    let when = raw
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Local))
        .unwrap_or_else(Local::now);
    when.format("%d/%m/%Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    fn record(id: &str, title: &str) -> ScrapedRecord {
        ScrapedRecord {
            id: id.to_string(),
            title: title.to_string(),
            link: format!("http://example.com/{}", id),
            description: None,
            price: None,
            category: None,
            timestamp: Some("2024-05-01T12:00:00Z".to_string()),
        }
    }

    fn cell_grid(bytes: &[u8]) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes.to_vec())).expect("workbook should open");
        let range = workbook
            .worksheet_range(SHEET_NAME)
            .expect("sheet should exist");
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn one_row_per_record_plus_header() {
        let records = vec![record("1", "First"), record("2", "Second"), record("3", "Third")];
        let bytes = build_workbook(&records).unwrap();

        let grid = cell_grid(&bytes);
        assert_eq!(grid.len(), records.len() + 1);
        assert_eq!(grid[0], vec!["Title", "Category", "Price", "Link", "Captured At"]);
        assert_eq!(grid[1][0], "First");
        assert_eq!(grid[3][0], "Third");
    }

    #[test]
    fn defaults_fill_missing_category_and_price() {
        let mut with_values = record("1", "Priced");
        with_values.category = Some("books".to_string());
        with_values.price = Some(Price::Text("R$ 19,90".to_string()));
        let bare = record("2", "Bare");

        let bytes = build_workbook(&[with_values, bare]).unwrap();
        let grid = cell_grid(&bytes);
        assert_eq!(grid[1][1], "books");
        assert_eq!(grid[1][2], "R$ 19,90");
        assert_eq!(grid[2][1], "N/A");
        assert_eq!(grid[2][2], "-");
    }

    #[test]
    fn export_local_skips_empty_record_lists() {
        let dir = tempfile::tempdir().unwrap();
        let result = export_local(&[], dir.path()).unwrap();
        assert!(result.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_local_writes_a_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_local(&[record("1", "A")], dir.path())
            .unwrap()
            .expect("a file should be written");
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("scrape_export_"));
        assert!(name.ends_with(".xlsx"));
        assert!(path.exists());
    }

    #[test]
    fn repeated_exports_have_identical_content() {
        let records = vec![record("1", "A"), record("2", "B")];
        let first = build_workbook(&records).unwrap();
        let second = build_workbook(&records).unwrap();
        assert_eq!(cell_grid(&first), cell_grid(&second));
    }

    #[test]
    fn export_remote_writes_decoded_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload = STANDARD.encode(b"not really a spreadsheet");
        let path = export_remote(&payload, "remote.xlsx", dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"not really a spreadsheet");
    }

    #[test]
    fn export_remote_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_remote("!!!not-base64!!!", "bad.xlsx", dir.path()).unwrap_err();
        assert!(err.to_string().contains("base64"));
    }
}
