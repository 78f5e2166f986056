//! Ingestion engine: runs a resolved parser over one file or a directory of
//! files and stamps ownership metadata on every transaction.
//!
//! The engine never chooses a parser. Callers hand it an already-resolved
//! [`Normalizer`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info, warn};
use rayon::prelude::*;
use uuid::Uuid;

use ledgerflow_core::Transaction;

use crate::error::{IngestError, ParseError};
use crate::parsers::Normalizer;

/// A file in a directory scan that could not be parsed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ParseError,
}

/// Outcome of [`Engine::process_dir`].
#[derive(Debug, Default)]
pub struct DirReport {
    /// Every matching file, in processing (name) order, including failures.
    pub files: Vec<PathBuf>,
    /// Transactions from the files that parsed, concatenated in file order.
    pub transactions: Vec<Transaction>,
    pub failures: Vec<FileFailure>,
}

impl DirReport {
    pub fn parsed_files(&self) -> usize {
        self.files.len() - self.failures.len()
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    user_id: Uuid,
}

impl Engine {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Parse a single file and stamp `user_id`, `upload_id` and one shared
    /// `processed_at` on every resulting transaction.
    pub fn process_file(
        &self,
        path: &Path,
        parser: &dyn Normalizer,
        upload_id: Uuid,
    ) -> Result<Vec<Transaction>, ParseError> {
        let mut transactions = parser.normalize(path)?;
        let processed_at = Utc::now();
        for tx in &mut transactions {
            tx.user_id = self.user_id;
            tx.upload_id = upload_id;
            tx.processed_at = Some(processed_at);
        }
        debug!(
            "{}: {} transactions from {}",
            parser.kind(),
            transactions.len(),
            path.display()
        );
        Ok(transactions)
    }

    /// Parse every regular file in `dir` whose extension matches `extension`.
    ///
    /// Files are processed in file-name order so that the order-sensitive
    /// transfer matching downstream sees the same input on every run. Parsing
    /// runs in parallel; a file that fails is recorded in
    /// [`DirReport::failures`] and the scan continues. A directory that does
    /// not exist yields an empty report.
    pub fn process_dir(
        &self,
        dir: &Path,
        extension: &str,
        parser: &dyn Normalizer,
        upload_id: Uuid,
    ) -> Result<DirReport, IngestError> {
        if !dir.exists() {
            warn!("directory {} does not exist, skipping", dir.display());
            return Ok(DirReport::default());
        }

        let files = list_files(dir, extension)?;

        let results: Vec<Result<Vec<Transaction>, ParseError>> = files
            .par_iter()
            .map(|path| self.process_file(path, parser, upload_id))
            .collect();

        let mut report = DirReport {
            files: files.clone(),
            ..Default::default()
        };
        for (path, result) in files.into_iter().zip(results) {
            match result {
                Ok(mut txs) => report.transactions.append(&mut txs),
                Err(error) => {
                    warn!("skipping {}: {}", path.display(), error);
                    report.failures.push(FileFailure { path, error });
                }
            }
        }

        info!(
            "{}: {} files, {} failed, {} transactions",
            dir.display(),
            report.files.len(),
            report.failures.len(),
            report.transactions.len()
        );
        Ok(report)
    }
}

/// Regular files in `dir` with the given extension (case-insensitive, the
/// leading dot optional), sorted by file name.
fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, IngestError> {
    let wanted = extension.trim_start_matches('.');
    let list_err = |source: std::io::Error| IngestError::ListDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
