// CSV helpers shared by the wallet and payroll parsers

use std::path::Path;

use crate::error::ParseError;

/// Read a file as text, decoding Windows-1252 when the bytes are not UTF-8
/// (common for spreadsheet-exported CSVs).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ParseError> {
    let bytes = std::fs::read(path).map_err(|e| ParseError::io(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Locate the real header row of a noisy export.
///
/// Returns the line index of the first line containing `marker` and the
/// delimiter to use for the rest of the file: `;` when the header line
/// contains one, `,` otherwise.
pub fn find_header(lines: &[&str], marker: &str) -> Option<(usize, u8)> {
    let idx = lines.iter().position(|line| line.contains(marker))?;
    let delimiter = if lines[idx].contains(';') { b';' } else { b',' };
    Some((idx, delimiter))
}

/// Header name → column index lookup with a typed error for absent columns.
pub struct ColumnIndex {
    headers: Vec<String>,
}

impl ColumnIndex {
    pub fn new(headers: &::csv::StringRecord) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn require(&self, name: &str) -> Result<usize, ParseError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    }
}
