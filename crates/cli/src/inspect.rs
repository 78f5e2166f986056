//! `ledgerflow parse` and `ledgerflow show`: print transactions as JSON.

use std::path::PathBuf;

use uuid::Uuid;

use ledgerflow_core::Transaction;
use ledgerflow_io::{Engine, ParserKind};
use ledgerflow_recon::snapshot::{to_json, write_snapshot};
use ledgerflow_recon::{JsonFileStore, TransactionStore};

use crate::exit_codes::EXIT_ERROR;
use crate::upload::resolve_store;
use crate::CliError;

/// Run one parser over one file. No consolidation.
pub fn cmd_parse(parser: ParserKind, file: PathBuf, out: Option<PathBuf>) -> Result<(), CliError> {
    let transactions = Engine::new(Uuid::nil()).process_file(&file, parser.parser().as_ref(), Uuid::new_v4())?;
    match out {
        Some(path) => {
            write_snapshot(&path, &transactions)?;
            eprintln!("wrote {} transactions to {}", transactions.len(), path.display());
            Ok(())
        }
        None => print_json(&transactions),
    }
}

pub fn cmd_show(store: Option<PathBuf>, user: Uuid) -> Result<(), CliError> {
    let path = resolve_store(store)?;
    if !path.exists() {
        return Err(CliError::io(format!("store not found: {}", path.display())));
    }
    let transactions = JsonFileStore::new(&path).read(user)?;
    print_json(&transactions)
}

fn print_json(transactions: &[Transaction]) -> Result<(), CliError> {
    let json = to_json(transactions).map_err(|e| CliError {
        code: EXIT_ERROR,
        message: format!("cannot serialize transactions: {e}"),
        hint: None,
    })?;
    print!("{json}");
    Ok(())
}
