//! Santander checking-account movements export (XLSX).
//!
//! The sheet carries a fixed block of account information above the data;
//! movements start at row 13 (index 12). Columns used:
//! B date (`DD/MM/YYYY`), D description, G signed amount, H balance.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use ledgerflow_core::text::contains_any;
use ledgerflow_core::{clean_amount, infer_category, Transaction};

use super::{Normalizer, ParserKind};
use crate::error::ParseError;
use crate::xlsx::read_rows;

const SOURCE: &str = "santander";
const ACCOUNT: &str = "caja_ahorro_pesos";
const CURRENCY: &str = "ARS";

static CELL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("static pattern"));

pub const DATA_START_ROW: usize = 12;
const MIN_CELLS: usize = 8;

const DATE_COL: usize = 1;
const DESCRIPTION_COL: usize = 3;
const AMOUNT_COL: usize = 6;
const BALANCE_COL: usize = 7;

const TAX_KEYWORDS: &[&str] = &["impuesto", "iva", "percepción", "sircreb", "db.rg"];
const FEE_KEYWORDS: &[&str] = &["comision", "cargo", "interes"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SantanderXlsxParser;

impl SantanderXlsxParser {
    /// Parse rows as returned by [`read_rows`] (absolute row/column positions).
    pub fn parse_rows(&self, rows: &[Vec<String>]) -> Result<Vec<Transaction>, ParseError> {
        let mut transactions = Vec::new();

        for row in rows.iter().skip(DATA_START_ROW) {
            if row.len() < MIN_CELLS {
                continue;
            }

            let Some(date) = CELL_DATE
                .find(&row[DATE_COL])
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%d/%m/%Y").ok())
            else {
                continue;
            };

            let description = row[DESCRIPTION_COL].trim();
            let amount = clean_amount(&row[AMOUNT_COL]);
            if amount == Decimal::ZERO {
                continue;
            }

            let mut tx = Transaction::new(SOURCE, ACCOUNT, date, amount, CURRENCY, description);
            tx.balance = Some(clean_amount(&row[BALANCE_COL]));
            tx.is_tax = contains_any(description, TAX_KEYWORDS);
            tx.is_transfer = contains_any(description, &["transferencia"]);
            tx.is_fee = contains_any(description, FEE_KEYWORDS);
            tx.set_category(infer_category(description));
            transactions.push(tx);
        }

        Ok(transactions)
    }
}

impl Normalizer for SantanderXlsxParser {
    fn kind(&self) -> ParserKind {
        ParserKind::SantanderXlsx
    }

    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let rows = read_rows(path)?;
        self.parse_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerflow_core::Direction;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn row(date: &str, description: &str, amount: &str, balance: &str) -> Vec<String> {
        vec![
            String::new(),
            date.to_string(),
            String::new(),
            description.to_string(),
            String::new(),
            String::new(),
            amount.to_string(),
            balance.to_string(),
        ]
    }

    fn sheet_rows() -> Vec<Vec<String>> {
        let mut rows = vec![vec!["Cuenta".to_string()]; DATA_START_ROW];
        rows.push(row("10/03/2024", "Transferencia a terceros", "-1.000,00", "9.000,00"));
        rows.push(row("11/03/2024", "Impuesto Ley 25413 Db.Rg", "-6,00", "8.994,00"));
        rows.push(row("Fecha", "Descripcion", "Importe", "Saldo"));
        rows.push(row("12/03/2024", "Saldo anterior", "0,00", "8.994,00"));
        rows.push(vec!["".into(), "13/03/2024".into(), "".into(), "corta".into()]);
        rows.push(row("14/03/2024", "Haberes ACME", "250.000,00", "258.994,00"));
        rows
    }

    #[test]
    fn data_rows_start_after_header_block() {
        let mut rows = sheet_rows();
        // a date-shaped row inside the info block is ignored
        rows[3] = row("01/01/2024", "no es movimiento", "-1,00", "0,00");
        let txs = SantanderXlsxParser.parse_rows(&rows).unwrap();
        assert_eq!(txs.len(), 3);
        assert!(txs.iter().all(|t| t.description != "no es movimiento"));
    }

    #[test]
    fn row_fields_and_tags() {
        let txs = SantanderXlsxParser.parse_rows(&sheet_rows()).unwrap();

        let transfer = &txs[0];
        assert_eq!(transfer.date.to_string(), "2024-03-10");
        assert_eq!(transfer.amount, dec!(-1000.00));
        assert_eq!(transfer.balance, Some(dec!(9000.00)));
        assert!(transfer.is_transfer);
        assert_eq!(transfer.merchant, None);
        assert_eq!(transfer.source, "santander");
        assert_eq!(transfer.account, "caja_ahorro_pesos");

        let tax = &txs[1];
        assert!(tax.is_tax);
        assert_eq!(tax.category.as_deref(), Some("impuestos"));

        let salary = &txs[2];
        assert_eq!(salary.direction, Direction::Credit);
        assert_eq!(salary.subcategory.as_deref(), Some("sueldo"));
    }

    #[test]
    fn reads_a_real_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("santander.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1").unwrap();
        sheet.write_string(0, 0, "Cuenta: 000-123456/7").unwrap();
        sheet.write_string(12, 1, "15/03/2024").unwrap();
        sheet.write_string(12, 3, "Pago Netflix").unwrap();
        sheet.write_number(12, 6, -3500.5).unwrap();
        sheet.write_number(12, 7, 10000.0).unwrap();
        workbook.save(&path).unwrap();

        let txs = SantanderXlsxParser.normalize(&path).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, dec!(-3500.5));
        assert_eq!(txs[0].balance, Some(dec!(10000)));
        assert_eq!(txs[0].category.as_deref(), Some("entretenimiento"));
    }
}
