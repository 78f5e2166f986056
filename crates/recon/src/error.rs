use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// Persistence collaborator failure (read or upsert).
    #[error("store error: {0}")]
    Store(String),

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Settings that deserialized but are out of range.
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// JSON snapshot could not be written or read back.
    #[error("snapshot {}: {message}", path.display())]
    Snapshot { path: PathBuf, message: String },
}

impl ReconError {
    pub(crate) fn snapshot(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
