//! `ledgerflow upload`: interactive single-file ingestion into a store.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use ledgerflow_io::Engine;
use ledgerflow_recon::{Consolidation, Consolidator, JsonFileStore, NeutralizeConfig, TransactionStore};

use crate::exit_codes::EXIT_UNSUPPORTED;
use crate::select::pick_parser;
use crate::CliError;

pub const STORE_FILE: &str = "store.json";

/// `<data dir>/ledgerflow/store.json`, if the platform has one.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("ledgerflow").join(STORE_FILE))
}

pub fn resolve_store(store: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match store {
        Some(p) => Ok(p),
        None => default_store_path()
            .ok_or_else(|| CliError::args("no --store given and no platform data directory")),
    }
}

pub fn cmd_upload(
    file: PathBuf,
    user: Uuid,
    store: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> Result<(), CliError> {
    let store_path = resolve_store(store)?;
    let upload_id = Uuid::new_v4();

    let consolidation = upload_file(&file, user, upload_id, &JsonFileStore::new(&store_path), snapshot)?;

    println!("upload:        {}", upload_id);
    println!("transactions:  {} for user {}", consolidation.transactions.len(), user);
    println!("duplicates:    {}", consolidation.stats.duplicates);
    println!("neutralized:   {} pairs", consolidation.stats.neutralize.pairs);
    println!("store:         {}", store_path.display());
    Ok(())
}

/// Pick a parser from the file name, parse, then merge into the store.
///
/// Unsupported file names are rejected before anything is read.
pub fn upload_file(
    file: &Path,
    user: Uuid,
    upload_id: Uuid,
    store: &dyn TransactionStore,
    snapshot: Option<PathBuf>,
) -> Result<Consolidation, CliError> {
    let kind = pick_parser(file).ok_or_else(|| CliError {
        code: EXIT_UNSUPPORTED,
        message: format!("unsupported file: {}", file.display()),
        hint: Some(
            "expected .pdf with brubank/visa/santander, .csv with mercadopago/deel, or .xlsx with santander in the name"
                .to_string(),
        ),
    })?;
    tracing::info!("{}: using {}", file.display(), kind);

    let transactions = Engine::new(user).process_file(file, kind.parser().as_ref(), upload_id)?;

    let mut consolidator = Consolidator::new(NeutralizeConfig::default());
    if let Some(path) = snapshot {
        consolidator = consolidator.with_snapshot(path);
    }
    Ok(consolidator.save_and_consolidate(store, user, transactions)?)
}
