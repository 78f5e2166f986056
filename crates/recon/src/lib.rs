//! `ledgerflow-recon`: whole-set stages over canonical transactions.
//!
//! Receives already-parsed transactions and returns the consolidated set:
//! deduplication, rule-based recategorization, internal-transfer
//! neutralization and ordering, plus the persistence contract the result is
//! handed to. No parser or CLI dependencies.

pub mod consolidate;
pub mod dedup;
pub mod error;
pub mod neutralize;
pub mod rules;
pub mod snapshot;
pub mod store;

pub use consolidate::{ConsolidateStats, Consolidation, Consolidator};
pub use dedup::dedupe;
pub use error::ReconError;
pub use neutralize::{neutralize, NeutralizeConfig, NeutralizeSummary};
pub use rules::{Rule, RuleSet};
pub use store::{JsonFileStore, MemoryStore, TransactionStore};
