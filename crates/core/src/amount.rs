//! Locale-aware amount parsing.
//!
//! Bank exports in this domain mix two conventions: `1.234,56` (thousands
//! dot, decimal comma) and machine formats like `1234.56`. Everything here
//! returns exact `Decimal` values; floats never enter the pipeline.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a formatted amount using the Latin-American convention.
///
/// Every character except digits, `,`, `.` and `-` is dropped first, so
/// currency symbols and spacing are ignored. Then:
/// - both `,` and `.` present: `.` is the thousands separator, `,` the decimal
/// - only `,` present: `,` is the decimal separator
///
/// Returns `None` for empty input, a bare `-`, `nan`, or anything that still
/// fails to parse after cleaning.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    let mut clean: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if clean.is_empty() {
        return None;
    }

    if clean.contains(',') && clean.contains('.') {
        clean = clean.replace('.', "").replace(',', ".");
    } else if clean.contains(',') {
        clean = clean.replace(',', ".");
    }

    Decimal::from_str(&clean).ok()
}

/// [`parse_amount`] with the zero fallback.
///
/// A returned zero is ambiguous: it may be a genuine zero line or a parse
/// failure. Parsers that skip zero-amount rows depend on exactly this.
pub fn clean_amount(input: &str) -> Decimal {
    parse_amount(input).unwrap_or(Decimal::ZERO)
}

/// Parse a dot-decimal amount (`-1234.50`) with no locale rewriting.
pub fn parse_plain_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
