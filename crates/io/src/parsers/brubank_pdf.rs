//! Brubank checking-account statement (PDF).
//!
//! The extracted text lays each movement out as a block of lines anchored on
//! a `DD-MM-YY` date line:
//!
//! ```text
//! 10-03-24        <- date
//! 0001234         <- reference (ignored)
//! Compra NETFLIX  <- description
//! 3.500,00        <- debit
//!                 <- credit
//! 96.500,00       <- balance
//! ```

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use ledgerflow_core::text::{contains_any, first_token};
use ledgerflow_core::{clean_amount, infer_category, Transaction};

use super::{Normalizer, ParserKind};
use crate::error::ParseError;
use crate::pdf::extract_text;

const SOURCE: &str = "brubank";
const ACCOUNT: &str = "caja_ahorro_pesos";
const CURRENCY: &str = "ARS";

/// Lines consumed after the date line: reference, description, debit,
/// credit, balance.
const BLOCK_LEN: usize = 5;

static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{2}$").expect("static pattern"));

const TAX_KEYWORDS: &[&str] = &["iva", "percepción", "ganancias", "impuesto", "sircreb", "arca", "afip"];
const TRANSFER_KEYWORDS: &[&str] = &["cuenta tuya", "transferencia", "enviada", "recibida"];
const FEE_KEYWORDS: &[&str] = &["comisión", "reimpresión", "intereses pagados", "mantenimiento"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BrubankPdfParser;

impl BrubankPdfParser {
    /// Parse already-extracted statement text.
    pub fn parse_text(&self, text: &str) -> Result<Vec<Transaction>, ParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut transactions = Vec::new();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();
            if !DATE_LINE.is_match(line) || i + BLOCK_LEN >= lines.len() {
                i += 1;
                continue;
            }

            let Ok(date) = NaiveDate::parse_from_str(line, "%d-%m-%y") else {
                i += 1;
                continue;
            };

            let description = lines[i + 2].trim();
            let debit = clean_amount(lines[i + 3]);
            let credit = clean_amount(lines[i + 4]);
            let balance = clean_amount(lines[i + 5]);
            let amount = credit - debit;

            let mut tx = Transaction::new(SOURCE, ACCOUNT, date, amount, CURRENCY, description);
            tx.balance = Some(balance);
            tx.is_tax = contains_any(description, TAX_KEYWORDS);
            tx.is_transfer = contains_any(description, TRANSFER_KEYWORDS);
            tx.is_fee = contains_any(description, FEE_KEYWORDS);
            tx.set_category(infer_category(description));
            if !tx.is_tax && !tx.is_transfer && !tx.is_fee {
                if let Some(token) = first_token(description) {
                    tx.set_merchant(token);
                }
            }
            transactions.push(tx);

            i += BLOCK_LEN + 1;
        }

        Ok(transactions)
    }
}

impl Normalizer for BrubankPdfParser {
    fn kind(&self) -> ParserKind {
        ParserKind::BrubankPdf
    }

    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let text = extract_text(path)?;
        self.parse_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerflow_core::Direction;
    use rust_decimal_macros::dec;

    const STATEMENT: &str = "\
Resumen de cuenta
Fecha
Referencia
10-03-24
0001234
Transferencia enviada a cuenta tuya
1.000,00

99.000,00
11-03-24
0001235
NETFLIX.COM suscripcion
3.500,00

95.500,00
12-03-24
0001236
Percepción IVA RG 4815
105,00

95.395,00
13-03-24
0001237
Sueldo ACME SA

250.000,00
345.395,00
";

    #[test]
    fn parses_date_anchored_blocks() {
        let txs = BrubankPdfParser.parse_text(STATEMENT).unwrap();
        assert_eq!(txs.len(), 4);

        let t = &txs[0];
        assert_eq!(t.date.to_string(), "2024-03-10");
        assert_eq!(t.amount, dec!(-1000.00));
        assert_eq!(t.direction, Direction::Debit);
        assert_eq!(t.balance, Some(dec!(99000.00)));
        assert_eq!(t.description, "Transferencia enviada a cuenta tuya");
        assert!(t.is_transfer);
        assert_eq!(t.merchant, None);
        assert_eq!(t.source, "brubank");
        assert_eq!(t.account, "caja_ahorro_pesos");
        assert_eq!(t.currency, "ARS");
    }

    #[test]
    fn merchant_and_category_for_plain_purchases() {
        let txs = BrubankPdfParser.parse_text(STATEMENT).unwrap();
        let netflix = &txs[1];
        assert_eq!(netflix.merchant.as_deref(), Some("NETFLIX.COM"));
        assert_eq!(netflix.category.as_deref(), Some("entretenimiento"));
        assert_eq!(netflix.subcategory.as_deref(), Some("servicios digitales"));
    }

    #[test]
    fn tax_rows_are_tagged_and_have_no_merchant() {
        let txs = BrubankPdfParser.parse_text(STATEMENT).unwrap();
        let tax = &txs[2];
        assert!(tax.is_tax);
        assert!(!tax.is_transfer);
        assert_eq!(tax.merchant, None);
        assert_eq!(tax.category.as_deref(), Some("impuestos"));
    }

    #[test]
    fn credits_are_positive() {
        let txs = BrubankPdfParser.parse_text(STATEMENT).unwrap();
        let salary = &txs[3];
        assert_eq!(salary.amount, dec!(250000.00));
        assert_eq!(salary.direction, Direction::Credit);
        assert_eq!(salary.category.as_deref(), Some("ingresos"));
        assert_eq!(salary.subcategory.as_deref(), Some("sueldo"));
    }

    #[test]
    fn truncated_trailing_block_is_skipped() {
        let text = format!("{STATEMENT}14-03-24\n0001238\nCompra\n");
        let txs = BrubankPdfParser.parse_text(&text).unwrap();
        assert_eq!(txs.len(), 4);
    }

    #[test]
    fn same_text_yields_same_ids() {
        let a: Vec<String> = BrubankPdfParser.parse_text(STATEMENT).unwrap().into_iter().map(|t| t.id).collect();
        let b: Vec<String> = BrubankPdfParser.parse_text(STATEMENT).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(a, b);
    }
}
