//! Deel payroll balance export (CSV).
//!
//! A plain comma-separated file with a header row. Only completed
//! transactions are kept; amounts use a dot decimal and are already signed.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerflow_core::text::contains_any;
use ledgerflow_core::{infer_category, parse_plain_amount, Category, Transaction};

use super::{Normalizer, ParserKind};
use crate::csv::{read_file_as_utf8, ColumnIndex};
use crate::error::ParseError;

const SOURCE: &str = "deel";
const ACCOUNT: &str = "balance_usd";

const WITHDRAWAL_TYPES: &[&str] = &["withdrawal", "deel_card_withdrawal"];

#[derive(Debug, Clone, Copy, Default)]
pub struct DeelCsvParser;

impl DeelCsvParser {
    pub fn parse_str(&self, content: &str) -> Result<Vec<Transaction>, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let cols = ColumnIndex::new(reader.headers()?);
        let status_col = cols.require("Transaction Status")?;
        let date_col = cols.require("Date Requested")?;
        let amount_col = cols.require("Transaction Amount")?;
        let currency_col = cols.require("Currency")?;
        let type_col = cols.require("Transaction Type")?;
        let client_col = cols.require("Client")?;
        let contract_col = cols.require("Contract Name")?;

        let mut transactions = Vec::new();

        for record in reader.records() {
            let Ok(row) = record else { continue };
            let field = |idx: usize| row.get(idx).unwrap_or("").trim();

            if !field(status_col).eq_ignore_ascii_case("completed") {
                continue;
            }

            // "2024-03-01 10:22:31" or "2024-03-01T10:22:31Z"
            let Some(date) = field(date_col)
                .split([' ', 'T'])
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            else {
                continue;
            };

            let amount = parse_plain_amount(field(amount_col)).unwrap_or(Decimal::ZERO);
            let tx_type = field(type_col);
            let client = field(client_col);
            let description = format!("{}: {} {}", tx_type, client, field(contract_col))
                .trim()
                .to_string();

            let mut tx = Transaction::new(
                SOURCE,
                ACCOUNT,
                date,
                amount,
                field(currency_col),
                description,
            );
            tx.is_tax = contains_any(&tx.description, &["tax"]);
            tx.is_transfer = WITHDRAWAL_TYPES.contains(&tx_type);
            tx.is_fee = contains_any(&tx.description, &["fee"]) || tx_type == "provider_fee";

            let category = infer_category(&tx.description).or_else(|| {
                (tx_type == "client_payment").then(|| Category::new("ingresos", "sueldo"))
            });
            tx.set_category(category);
            tx.set_merchant(client);
            transactions.push(tx);
        }

        Ok(transactions)
    }
}

impl Normalizer for DeelCsvParser {
    fn kind(&self) -> ParserKind {
        ParserKind::DeelCsv
    }

    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let content = read_file_as_utf8(path)?;
        self.parse_str(&content)
    }
}
