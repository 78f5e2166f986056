//! Mercado Pago account activity export (CSV).
//!
//! The export starts with a balance summary before the real header row, so
//! the header is located by its `RELEASE_DATE` column. The delimiter is
//! whatever the header row uses (`;` or `,`).

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use ledgerflow_core::text::{contains_any, first_token};
use ledgerflow_core::{clean_amount, infer_category, Transaction};

use super::{Normalizer, ParserKind};
use crate::csv::{find_header, read_file_as_utf8, ColumnIndex};
use crate::error::ParseError;

const SOURCE: &str = "mercadopago";
const ACCOUNT: &str = "cuenta_digital";
const CURRENCY: &str = "ARS";

const HEADER_MARKER: &str = "RELEASE_DATE";

static RELEASE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}-\d{2}-\d{4}").expect("static pattern"));

const TAX_KEYWORDS: &[&str] = &["percepción", "iva", "impuesto", "arca"];
const TRANSFER_KEYWORDS: &[&str] = &[
    "transferencia",
    "enviaste",
    "recibiste",
    "de una cuenta tuya",
    "a una cuenta tuya",
];
const FEE_KEYWORDS: &[&str] = &["comisión"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MercadoPagoCsvParser;

impl MercadoPagoCsvParser {
    pub fn parse_str(&self, content: &str) -> Result<Vec<Transaction>, ParseError> {
        let lines: Vec<&str> = content.split('\n').collect();
        let (header_idx, delimiter) = find_header(&lines, HEADER_MARKER)
            .ok_or_else(|| ParseError::MissingHeader(HEADER_MARKER.to_string()))?;
        let body = lines[header_idx..].join("\n");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(body.as_bytes());

        let cols = ColumnIndex::new(reader.headers()?);
        let date_col = cols.require("RELEASE_DATE")?;
        let amount_col = cols.require("TRANSACTION_NET_AMOUNT")?;
        let type_col = cols.require("TRANSACTION_TYPE")?;
        let balance_col = cols.require("PARTIAL_BALANCE")?;

        let mut transactions = Vec::new();

        for record in reader.records() {
            let Ok(row) = record else { continue };
            if row.len() < cols.len() {
                continue;
            }

            let Some(date) = RELEASE_DATE
                .find(&row[date_col])
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%d-%m-%Y").ok())
            else {
                continue;
            };

            let description = row[type_col].trim();
            let amount = clean_amount(&row[amount_col]);

            let mut tx = Transaction::new(SOURCE, ACCOUNT, date, amount, CURRENCY, description);
            tx.balance = Some(clean_amount(&row[balance_col]));
            tx.is_tax = contains_any(description, TAX_KEYWORDS);
            tx.is_transfer = contains_any(description, TRANSFER_KEYWORDS);
            tx.is_fee = contains_any(description, FEE_KEYWORDS);
            tx.set_category(infer_category(description));
            if let Some(merchant) = merchant_of(description) {
                tx.set_merchant(merchant);
            }
            transactions.push(tx);
        }

        Ok(transactions)
    }
}

impl Normalizer for MercadoPagoCsvParser {
    fn kind(&self) -> ParserKind {
        ParserKind::MercadoPagoCsv
    }

    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let content = read_file_as_utf8(path)?;
        self.parse_str(&content)
    }
}

/// `Pago <Merchant> ...` names the merchant first; transfers name the
/// counterparty after the direction word.
fn merchant_of(description: &str) -> Option<String> {
    if let Some(rest) = description.strip_prefix("Pago ") {
        return first_token(rest).map(str::to_string);
    }
    if description.starts_with("Transferencia ") {
        let counterparty = description
            .replace("Transferencia ", "")
            .replace("enviada ", "")
            .replace("recibida ", "");
        return Some(counterparty);
    }
    None
}
