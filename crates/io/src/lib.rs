//! `ledgerflow-io`: turns institution export files into canonical
//! transactions.
//!
//! One [`parsers::Normalizer`] per (institution, file format) pair, plus the
//! ingestion [`engine::Engine`] that runs them over single uploads or whole
//! directories and stamps ownership metadata. Choosing *which* parser to use
//! for a file is the caller's job.

pub mod csv;
pub mod engine;
pub mod error;
pub mod parsers;
pub mod pdf;
pub mod xlsx;

pub use engine::{DirReport, Engine, FileFailure};
pub use error::{IngestError, ParseError};
pub use parsers::{Normalizer, ParserKind};
