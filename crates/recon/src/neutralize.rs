//! Internal-transfer neutralization.
//!
//! An outgoing transfer on one account and the matching incoming transfer on
//! another describe one movement of money. Both legs are marked
//! `neutralized` and recategorized so they are not counted as expense and
//! income.
//!
//! Matching is greedy and first-found: debits are visited in input order and
//! each takes the first eligible credit in input order. Input order is
//! therefore part of the result.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerflow_core::{Transaction, INTERNAL_TRANSFER};

use crate::error::ReconError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralizeConfig {
    /// Relative amount tolerance, inclusive on both ends (0.005 = ±0.5%).
    pub tolerance: Decimal,
    /// How many days the credit may precede the debit.
    pub days_before: i64,
    /// How many days the credit may follow the debit.
    pub days_after: i64,
}

impl Default for NeutralizeConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(5, 3),
            days_before: 1,
            days_after: 3,
        }
    }
}

impl NeutralizeConfig {
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.tolerance < Decimal::ZERO || self.tolerance >= Decimal::ONE {
            return Err(ReconError::ConfigValidation(format!(
                "neutralize.tolerance must be in [0, 1), got {}",
                self.tolerance
            )));
        }
        if self.days_before < 0 || self.days_after < 0 {
            return Err(ReconError::ConfigValidation(
                "neutralize.days_before and days_after must not be negative".into(),
            ));
        }
        Ok(())
    }

    fn amount_matches(&self, target: Decimal, candidate: Decimal) -> bool {
        let lower = target * (Decimal::ONE - self.tolerance);
        let upper = target * (Decimal::ONE + self.tolerance);
        candidate >= lower && candidate <= upper
    }

    fn date_matches(&self, debit: &Transaction, credit: &Transaction) -> bool {
        let offset = (credit.date - debit.date).num_days();
        offset >= -self.days_before && offset <= self.days_after
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NeutralizeSummary {
    /// Unconsumed transfer debits considered.
    pub debits: usize,
    /// Unconsumed transfer credits considered.
    pub credits: usize,
    pub pairs: usize,
}

/// Pair transfer debits with transfer credits in place.
///
/// Only `is_transfer` rows take part. Rows that are already `neutralized`
/// count as consumed, so running this over its own output changes nothing.
pub fn neutralize(transactions: &mut [Transaction], config: &NeutralizeConfig) -> NeutralizeSummary {
    let mut debits = Vec::new();
    let mut credits = Vec::new();
    for (idx, tx) in transactions.iter().enumerate() {
        if !tx.is_transfer || tx.neutralized {
            continue;
        }
        if tx.amount < Decimal::ZERO {
            debits.push(idx);
        } else if tx.amount > Decimal::ZERO {
            credits.push(idx);
        }
    }

    let mut summary = NeutralizeSummary {
        debits: debits.len(),
        credits: credits.len(),
        pairs: 0,
    };
    let mut credit_used = vec![false; credits.len()];

    for &d in &debits {
        let debit = &transactions[d];
        let target = debit.amount.abs();

        let found = credits.iter().enumerate().find(|&(slot, &c)| {
            let credit = &transactions[c];
            !credit_used[slot]
                && config.amount_matches(target, credit.amount.abs())
                && config.date_matches(debit, credit)
        });

        let Some((slot, &c)) = found else {
            continue;
        };
        credit_used[slot] = true;
        for idx in [d, c] {
            let tx = &mut transactions[idx];
            tx.neutralized = true;
            tx.category = Some(INTERNAL_TRANSFER.to_string());
        }
        debug!("neutralized {} <-> {}", transactions[d].id, transactions[c].id);
        summary.pairs += 1;
    }

    summary
}
