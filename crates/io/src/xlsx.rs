// Excel import: worksheet cells as display strings

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};

use crate::error::ParseError;

/// Sheet read when present; otherwise the first sheet in the workbook.
pub const PREFERRED_SHEET: &str = "Sheet1";

/// Read one worksheet as rows of display strings.
///
/// Row and column indices are absolute (row 0 is the sheet's first row), even
/// when the used range starts further down, so fixed header offsets keep
/// their meaning.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, ParseError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ParseError::Sheet(format!("{}: {}", path.display(), e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names
        .iter()
        .find(|name| name.as_str() == PREFERRED_SHEET)
        .or_else(|| sheet_names.first())
        .cloned()
        .ok_or_else(|| ParseError::Sheet(format!("{}: workbook contains no sheets", path.display())))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Sheet(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];

    for row in range.rows() {
        let mut values = vec![String::new(); start_col as usize];
        values.extend(row.iter().map(cell_to_string));
        rows.push(values);
    }

    Ok(rows)
}

/// Render a cell the way a spreadsheet would display it as text.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Convert an Excel 1900-system serial to a calendar date.
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Serial 1 is 1900-01-01; the epoch is shifted two days to absorb
    // Excel's phantom 1900-02-29.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
