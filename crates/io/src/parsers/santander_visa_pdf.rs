//! Santander Visa credit-card statement (PDF).
//!
//! Movement lines look like `24 Marzo 05 012345 * NETFLIX.COM 3.500,00`.
//! Only the month and day come from the line; the year is taken from the
//! statement's `CIERRE DD Mon YY` closing-date header.
//!
//! Sign convention is inverted relative to the checking account: a plain
//! amount is a purchase (debit) and an amount with a trailing `-` is a
//! payment or refund (credit).

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use ledgerflow_core::text::{contains_any, first_token};
use ledgerflow_core::{clean_amount, infer_category, Transaction};

use super::{Normalizer, ParserKind};
use crate::error::ParseError;
use crate::pdf::extract_text;

const SOURCE: &str = "santander";
const ACCOUNT: &str = "credito_visa";
const CURRENCY: &str = "ARS";

/// `CIERRE 28 Mar 24`: the two-digit closing year.
static CLOSING_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CIERRE\s+\d{2}\s+\w{3}\s+(\d{2})").expect("static pattern"));

/// Year, month name, day, receipt, description, amount and an optional
/// installment amount.
static MOVEMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{2})\s+([a-zA-Z]{3,10})\s+(\d{2})\s+.*?\s+(.*?)\s+([\d\.,]+-?)(\s+[\d\.,]+-?)?$")
        .expect("static pattern")
});

const TAX_KEYWORDS: &[&str] = &["impuesto", "iva", "percepción", "db.rg"];
const FEE_KEYWORDS: &[&str] = &["comision", "cargo", "interes"];
const TRANSFER_MARKERS: &[&str] = &["SU PAGO", "PAGO EN"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SantanderVisaPdfParser;

impl SantanderVisaPdfParser {
    pub fn parse_text(&self, text: &str) -> Result<Vec<Transaction>, ParseError> {
        let year = CLOSING_DATE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .map(|yy| 2000 + yy)
            .ok_or(ParseError::MissingStatementDate)?;

        let mut transactions = Vec::new();

        for line in text.lines() {
            let Some(caps) = MOVEMENT_LINE.captures(line.trim_end()) else {
                continue;
            };

            let Some(month) = month_number(&caps[2]) else {
                continue;
            };
            let Some(date) = caps[3]
                .parse::<u32>()
                .ok()
                .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
            else {
                continue;
            };

            let description = caps[4].trim();
            let raw_amount = &caps[5];

            let amount = match raw_amount.strip_suffix('-') {
                // Payments and refunds: truncated, not rounded, to cents
                Some(unsigned) => clean_amount(unsigned)
                    .round_dp_with_strategy(2, RoundingStrategy::ToZero),
                None => -clean_amount(raw_amount),
            };
            if amount == Decimal::ZERO {
                continue;
            }

            let upper = description.to_uppercase();
            let mut tx = Transaction::new(SOURCE, ACCOUNT, date, amount, CURRENCY, description);
            tx.is_tax = contains_any(description, TAX_KEYWORDS);
            tx.is_transfer = TRANSFER_MARKERS.iter().any(|m| upper.contains(m));
            tx.is_fee = contains_any(description, FEE_KEYWORDS);
            tx.set_category(infer_category(description));
            if let Some(token) = first_token(description.trim_start_matches(['*', ' '])) {
                tx.set_merchant(token);
            }
            transactions.push(tx);
        }

        Ok(transactions)
    }
}

impl Normalizer for SantanderVisaPdfParser {
    fn kind(&self) -> ParserKind {
        ParserKind::SantanderVisaPdf
    }

    fn normalize(&self, path: &Path) -> Result<Vec<Transaction>, ParseError> {
        let text = extract_text(path)?;
        self.parse_text(&text)
    }
}

/// Spanish month names and three-letter abbreviations, any case.
fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "enero" | "ene" => 1,
        "febrero" | "feb" => 2,
        "marzo" | "mar" => 3,
        "abril" | "abr" => 4,
        "mayo" | "may" => 5,
        "junio" | "jun" => 6,
        "julio" | "jul" => 7,
        "agosto" | "ago" => 8,
        "setiembre" | "septiembre" | "set" | "sep" => 9,
        "octubre" | "oct" => 10,
        "noviembre" | "nov" => 11,
        "diciembre" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}
