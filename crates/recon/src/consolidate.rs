//! Consolidation: the whole-set stages that run after every parse is done.
//!
//! dedupe → recategorize → neutralize → sort by date, newest first.

use std::path::PathBuf;

use log::info;
use serde::Serialize;
use uuid::Uuid;

use ledgerflow_core::Transaction;

use crate::dedup::dedupe;
use crate::error::ReconError;
use crate::neutralize::{neutralize, NeutralizeConfig, NeutralizeSummary};
use crate::rules::RuleSet;
use crate::snapshot::write_snapshot;
use crate::store::TransactionStore;

#[derive(Debug, Clone, Default)]
pub struct Consolidator {
    neutralize: NeutralizeConfig,
    rules: RuleSet,
    snapshot: Option<PathBuf>,
}

/// Counters describing one consolidation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidateStats {
    pub input: usize,
    pub duplicates: usize,
    pub recategorized: usize,
    pub neutralize: NeutralizeSummary,
}

#[derive(Debug, Clone)]
pub struct Consolidation {
    pub transactions: Vec<Transaction>,
    pub stats: ConsolidateStats,
}

impl Consolidator {
    pub fn new(neutralize: NeutralizeConfig) -> Self {
        Self {
            neutralize,
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Also write every consolidated set to `path` as a JSON snapshot.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    pub fn consolidate(&self, transactions: Vec<Transaction>) -> Consolidation {
        let input = transactions.len();
        let mut txs = dedupe(transactions);
        let duplicates = input - txs.len();

        let recategorized = self.rules.recategorize(&mut txs);
        let neutralize = neutralize(&mut txs, &self.neutralize);

        // stable: equal dates keep ingestion order
        txs.sort_by(|a, b| b.date.cmp(&a.date));

        let stats = ConsolidateStats {
            input,
            duplicates,
            recategorized,
            neutralize,
        };
        info!(
            "consolidated {} -> {} transactions ({} duplicates, {} recategorized, {} transfer pairs)",
            input,
            txs.len(),
            duplicates,
            recategorized,
            neutralize.pairs
        );
        Consolidation {
            transactions: txs,
            stats,
        }
    }

    /// Merge `new` into the user's stored transactions, consolidate the
    /// union and upsert it.
    ///
    /// Stored rows come first so that a re-upload of an already stored file
    /// dedupes to the stored copy.
    pub fn save_and_consolidate(
        &self,
        store: &dyn TransactionStore,
        user_id: Uuid,
        new: Vec<Transaction>,
    ) -> Result<Consolidation, ReconError> {
        let mut all = store.read(user_id)?;
        all.extend(new);

        let consolidation = self.consolidate(all);
        store.upsert(&consolidation.transactions)?;
        if let Some(path) = &self.snapshot {
            write_snapshot(path, &consolidation.transactions)?;
        }
        Ok(consolidation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use ledgerflow_core::INTERNAL_TRANSFER;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn tx(source: &str, date: &str, amount: Decimal, desc: &str, transfer: bool) -> Transaction {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let mut tx = Transaction::new(source, "acct", date, amount, "ARS", desc);
        tx.is_transfer = transfer;
        tx
    }

    fn batch() -> Vec<Transaction> {
        vec![
            tx("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada", true),
            tx("brubank", "2024-03-01", dec!(-50.00), "Pago Uber", false),
            tx("mercadopago", "2024-03-12", dec!(1000.00), "Transferencia recibida", true),
            tx("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada", true),
            tx("deel", "2024-03-12", dec!(3000.00), "client_payment: Acme", false),
        ]
    }

    #[test]
    fn consolidate_runs_every_stage() {
        let consolidator = Consolidator::default().with_rules(RuleSet {
            merchants: vec![Rule::new("uber", "transporte", "taxi")],
            description_keywords: Vec::new(),
        });
        let out = consolidator.consolidate(batch());

        assert_eq!(out.stats.input, 5);
        assert_eq!(out.stats.duplicates, 1);
        assert_eq!(out.stats.recategorized, 1);
        assert_eq!(out.stats.neutralize.pairs, 1);

        let dates: Vec<String> = out.transactions.iter().map(|t| t.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-03-12", "2024-03-12", "2024-03-10", "2024-03-01"]);
        // equal dates keep input order
        assert_eq!(out.transactions[0].source, "mercadopago");
        assert_eq!(out.transactions[1].source, "deel");

        assert_eq!(out.transactions[2].category.as_deref(), Some(INTERNAL_TRANSFER));
        assert_eq!(out.transactions[3].category.as_deref(), Some("transporte"));
    }

    #[test]
    fn consolidating_consolidated_output_is_a_fixed_point() {
        let consolidator = Consolidator::default();
        let once = consolidator.consolidate(batch()).transactions;
        let twice = consolidator.consolidate(once.clone()).transactions;
        assert_eq!(once, twice);
    }

    #[test]
    fn save_and_consolidate_merges_with_stored_rows() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let owned = |mut t: Transaction| {
            t.user_id = user;
            t
        };

        let consolidator = Consolidator::default();
        let first = vec![owned(tx("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada", true))];
        let out = consolidator.save_and_consolidate(&store, user, first).unwrap();
        assert_eq!(out.stats.neutralize.pairs, 0);

        // the other leg arrives in a later upload
        let second = vec![
            owned(tx("mercadopago", "2024-03-11", dec!(1000.00), "Transferencia recibida", true)),
            owned(tx("brubank", "2024-03-10", dec!(-1000.00), "Transferencia enviada", true)),
        ];
        let out = consolidator.save_and_consolidate(&store, user, second).unwrap();
        assert_eq!(out.stats.duplicates, 1);
        assert_eq!(out.stats.neutralize.pairs, 1);

        let stored = store.read(user).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|t| t.neutralized));
    }

    #[test]
    fn save_and_consolidate_writes_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("consolidated_transactions.json");
        let store = MemoryStore::new();

        Consolidator::default()
            .with_snapshot(&path)
            .save_and_consolidate(&store, Uuid::nil(), batch())
            .unwrap();

        let snapshot = crate::snapshot::read_snapshot(&path).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot, store.read(Uuid::nil()).unwrap());
    }
}
