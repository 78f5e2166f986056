//! `ledgerflow run`: batch mode over every configured source directory.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use ledgerflow_core::Transaction;
use ledgerflow_io::Engine;
use ledgerflow_recon::snapshot::write_snapshot;
use ledgerflow_recon::{Consolidation, Consolidator, JsonFileStore, TransactionStore};

use crate::config::{default_config_path, PipelineConfig};
use crate::CliError;

pub const CONSOLIDATED_FILE: &str = "consolidated_transactions.json";

/// What one batch run did, for the printed summary.
#[derive(Debug, Default)]
pub struct RunReport {
    pub sources: usize,
    pub files: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub snapshots: Vec<PathBuf>,
    pub consolidation: Option<Consolidation>,
}

pub fn cmd_run(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let path = match config_path {
        Some(p) => p,
        None => default_config_path().ok_or_else(|| {
            CliError::args("no --config given and no platform config directory")
        })?,
    };
    if !path.exists() {
        return Err(CliError::args(format!("config not found: {}", path.display()))
            .with_hint("pass --config PATH or create ~/.config/ledgerflow/pipeline.toml"));
    }

    let config = PipelineConfig::load(&path)?;
    info!("loaded {} ({} sources)", path.display(), config.sources.len());

    let report = run_pipeline(&config)?;
    print_summary(&report);
    Ok(())
}

/// Ingest every source, write snapshots, consolidate and store.
///
/// Sources run in config order and each directory in file-name order, so
/// the same inputs always produce the same pairing.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport, CliError> {
    let engine = Engine::new(config.user_id);
    let upload_id = Uuid::new_v4();

    let mut report = RunReport {
        sources: config.sources.len(),
        ..Default::default()
    };
    // (snapshot stem, transactions) in first-seen order
    let mut groups: Vec<(String, Vec<Transaction>)> = Vec::new();

    for source in &config.sources {
        let parser = source.parser.parser();
        let dir_report = engine.process_dir(&source.dir, source.extension(), parser.as_ref(), upload_id)?;

        report.files += dir_report.files.len();
        for failure in dir_report.failures {
            report.failures.push((failure.path, failure.error.to_string()));
        }

        let stem = source.snapshot_stem();
        match groups.iter_mut().find(|(s, _)| s == stem) {
            Some((_, txs)) => txs.extend(dir_report.transactions),
            None => groups.push((stem.to_string(), dir_report.transactions)),
        }
    }

    let mut all = Vec::new();
    for (stem, txs) in groups {
        if txs.is_empty() {
            warn!("source '{}' produced no transactions", stem);
            continue;
        }
        let snapshot = snapshot_path(&config.output_dir, &stem);
        write_snapshot(&snapshot, &txs)?;
        report.snapshots.push(snapshot);
        all.extend(txs);
    }

    let consolidator = Consolidator::new(config.neutralize.clone()).with_rules(config.rules.clone());
    let consolidation = match &config.store {
        Some(store_path) => {
            let store = JsonFileStore::new(store_path);
            let consolidation = consolidator.save_and_consolidate(&store, config.user_id, all)?;
            info!("upserted {} transactions into {}", consolidation.transactions.len(), store.path().display());
            consolidation
        }
        None => consolidator.consolidate(all),
    };

    let consolidated = config.output_dir.join(CONSOLIDATED_FILE);
    write_snapshot(&consolidated, &consolidation.transactions)?;
    report.snapshots.push(consolidated);
    report.consolidation = Some(consolidation);

    Ok(report)
}

fn snapshot_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}.json"))
}

fn print_summary(report: &RunReport) {
    println!("sources:       {}", report.sources);
    println!("files:         {} ({} failed)", report.files, report.failures.len());
    for (path, error) in &report.failures {
        println!("  skipped {}: {}", path.display(), error);
    }
    if let Some(c) = &report.consolidation {
        println!("transactions:  {}", c.transactions.len());
        println!("duplicates:    {}", c.stats.duplicates);
        println!("recategorized: {}", c.stats.recategorized);
        println!("neutralized:   {} pairs", c.stats.neutralize.pairs);
    }
    for path in &report.snapshots {
        println!("wrote {}", path.display());
    }
}
