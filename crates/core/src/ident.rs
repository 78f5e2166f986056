//! Deterministic transaction identity.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use sha2::{Digest, Sha256};

/// Render an amount the way it enters the identity digest: exactly two
/// decimal places, half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// SHA-256 over `source ‖ account ‖ date ‖ amount(2dp) ‖ raw description`,
/// as 64 lowercase hex characters.
///
/// This is the only notion of identity in the system: dedup and store
/// upserts key on it, so the fields are concatenated with no separator and
/// the description is hashed untouched.
pub fn transaction_id(
    source: &str,
    account: &str,
    date: NaiveDate,
    amount: Decimal,
    raw_description: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(account.as_bytes());
    hasher.update(date.format("%Y-%m-%d").to_string().as_bytes());
    hasher.update(format_amount(amount).as_bytes());
    hasher.update(raw_description.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn amount_always_two_decimals() {
        assert_eq!(format_amount(dec!(1000)), "1000.00");
        assert_eq!(format_amount(dec!(-12.5)), "-12.50");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
    }

    #[test]
    fn id_matches_plain_concatenation_digest() {
        let id = transaction_id("brubank", "caja_ahorro_pesos", date("2024-03-10"), dec!(-1000), "Transferencia enviada");
        let mut hasher = Sha256::new();
        hasher.update(b"brubankcaja_ahorro_pesos2024-03-10-1000.00Transferencia enviada");
        assert_eq!(id, format!("{:x}", hasher.finalize()));
        assert_eq!(id.len(), 64);
    }

    #[test]
    fn id_is_stable_and_scale_insensitive() {
        let a = transaction_id("deel", "balance_usd", date("2024-01-02"), dec!(10.5), "x");
        let b = transaction_id("deel", "balance_usd", date("2024-01-02"), dec!(10.50), "x");
        assert_eq!(a, b);
    }

    #[test]
    fn description_is_part_of_identity() {
        let a = transaction_id("s", "a", date("2024-01-02"), dec!(1), "cafe");
        let b = transaction_id("s", "a", date("2024-01-02"), dec!(1), "cafe ");
        assert_ne!(a, b);
    }
}
