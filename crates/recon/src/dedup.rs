use std::collections::HashSet;

use ledgerflow_core::Transaction;

/// Keep the first occurrence of every id, preserving input order.
///
/// Later duplicates are dropped as-is; no fields are merged.
pub fn dedupe(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::with_capacity(transactions.len());
    transactions
        .into_iter()
        .filter(|tx| seen.insert(tx.id.clone()))
        .collect()
}
