//! Flat-file JSON snapshots of a transaction set, for inspection and audit.
//!
//! A snapshot is a JSON array of transactions with 2-space indentation and a
//! trailing newline. It is never the system of record.

use std::fs;
use std::path::Path;

use ledgerflow_core::Transaction;

use crate::error::ReconError;

pub fn to_json(transactions: &[Transaction]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(transactions)?;
    json.push('\n');
    Ok(json)
}

/// Write `transactions` to `path`, creating parent directories as needed.
///
/// The file is written to a sibling temp file first and renamed into place.
pub fn write_snapshot(path: &Path, transactions: &[Transaction]) -> Result<(), ReconError> {
    let json = to_json(transactions).map_err(|e| ReconError::snapshot(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReconError::snapshot(path, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| ReconError::snapshot(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| ReconError::snapshot(path, e))?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<Transaction>, ReconError> {
    let content = fs::read_to_string(path).map_err(|e| ReconError::snapshot(path, e))?;
    serde_json::from_str(&content).map_err(|e| ReconError::snapshot(path, e))
}
