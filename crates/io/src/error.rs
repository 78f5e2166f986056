use std::path::PathBuf;

use thiserror::Error;

/// File-level parse failure. Row-level problems never surface here: a
/// malformed row is skipped and parsing continues.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot extract PDF text: {0}")]
    Pdf(String),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("cannot read spreadsheet: {0}")]
    Sheet(String),

    /// The marker header row a noisy export is anchored on was not found.
    #[error("header row containing '{0}' not found")]
    MissingHeader(String),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("statement closing date not found")]
    MissingStatementDate,
}

impl ParseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot list {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
