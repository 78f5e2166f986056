//! Format parsers, one per (institution, file format) pair.
//!
//! Every parser reads a whole file and yields canonical transactions. Keyword
//! lists for the tax/transfer/fee tags live with each parser because every
//! institution words things differently.

mod brubank_pdf;
mod deel_csv;
mod mercadopago_csv;
mod santander_visa_pdf;
mod santander_xlsx;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ledgerflow_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub use brubank_pdf::BrubankPdfParser;
pub use deel_csv::DeelCsvParser;
pub use mercadopago_csv::MercadoPagoCsvParser;
pub use santander_visa_pdf::SantanderVisaPdfParser;
pub use santander_xlsx::SantanderXlsxParser;

/// The single capability every format parser provides.
///
/// Implementations are stateless, so one instance may parse many files
/// concurrently.
pub trait Normalizer: Send + Sync {
    fn kind(&self) -> ParserKind;

    /// Parse one file. Unreadable or undecodable files are an error; rows
    /// that don't fit the expected shape are skipped.
    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParserKind {
    #[serde(rename = "brubank-pdf")]
    BrubankPdf,
    #[serde(rename = "santander-visa-pdf")]
    SantanderVisaPdf,
    #[serde(rename = "mercadopago-csv")]
    MercadoPagoCsv,
    #[serde(rename = "deel-csv")]
    DeelCsv,
    #[serde(rename = "santander-xlsx")]
    SantanderXlsx,
}

impl ParserKind {
    pub const ALL: [ParserKind; 5] = [
        Self::BrubankPdf,
        Self::SantanderVisaPdf,
        Self::MercadoPagoCsv,
        Self::DeelCsv,
        Self::SantanderXlsx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrubankPdf => "brubank-pdf",
            Self::SantanderVisaPdf => "santander-visa-pdf",
            Self::MercadoPagoCsv => "mercadopago-csv",
            Self::DeelCsv => "deel-csv",
            Self::SantanderXlsx => "santander-xlsx",
        }
    }

    /// File extension (without the dot) this parser reads.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::BrubankPdf | Self::SantanderVisaPdf => "pdf",
            Self::MercadoPagoCsv | Self::DeelCsv => "csv",
            Self::SantanderXlsx => "xlsx",
        }
    }

    pub fn parser(&self) -> Box<dyn Normalizer> {
        match self {
            Self::BrubankPdf => Box::new(BrubankPdfParser),
            Self::SantanderVisaPdf => Box::new(SantanderVisaPdfParser),
            Self::MercadoPagoCsv => Box::new(MercadoPagoCsvParser),
            Self::DeelCsv => Box::new(DeelCsvParser),
            Self::SantanderXlsx => Box::new(SantanderXlsxParser),
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown parser '{}' (available: {})", s, names.join(", "))
            })
    }
}
