// ledgerflow CLI - bank statement ingestion, deduplication and transfer
// neutralization

mod config;
mod exit_codes;
mod inspect;
mod run;
mod select;
mod upload;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use ledgerflow_io::{IngestError, ParseError, ParserKind};
use ledgerflow_recon::ReconError;

use exit_codes::{EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "ledgerflow")]
#[command(about = "Normalize bank exports into one deduplicated, transfer-neutral ledger")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured source directory through the pipeline
    #[command(after_help = "\
Examples:
  ledgerflow run
  ledgerflow run --config ~/Cuentas/pipeline.toml
  RUST_LOG=debug ledgerflow run")]
    Run {
        /// Pipeline config (default: <config dir>/ledgerflow/pipeline.toml)
        #[arg(long, short = 'c', env = "LEDGERFLOW_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Parse one file with an explicit parser and print its transactions
    #[command(after_help = "\
Examples:
  ledgerflow parse --parser brubank-pdf resumen.pdf
  ledgerflow parse --parser mercadopago-csv activity.csv --out mp.json")]
    Parse {
        /// brubank-pdf, santander-visa-pdf, mercadopago-csv, deel-csv, santander-xlsx
        #[arg(long, short = 'p')]
        parser: ParserKind,

        /// Input file
        file: PathBuf,

        /// Write the JSON array here instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Ingest one uploaded file into the store, choosing the parser from its name
    #[command(after_help = "\
Examples:
  ledgerflow upload Brubank_2024-03.pdf
  ledgerflow upload mercadopago.csv --user 6f1c2b9e-3a41-4d0c-9a55-0d6c1f1e2a10 --store out/store.json")]
    Upload {
        file: PathBuf,

        /// Owner of the uploaded transactions
        #[arg(long, short = 'u', default_value_t = Uuid::nil())]
        user: Uuid,

        /// JSON store (default: <data dir>/ledgerflow/store.json)
        #[arg(long, short = 's', env = "LEDGERFLOW_STORE")]
        store: Option<PathBuf>,

        /// Also write the consolidated set to this JSON file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print a user's stored transactions as JSON
    Show {
        #[arg(long, short = 's', env = "LEDGERFLOW_STORE")]
        store: Option<PathBuf>,

        #[arg(long, short = 'u', default_value_t = Uuid::nil())]
        user: Uuid,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
        "\nparsers: brubank-pdf santander-visa-pdf mercadopago-csv deel-csv santander-xlsx",
    )
}

/// Logs go to stderr so JSON on stdout stays clean. `RUST_LOG` overrides
/// the default `info` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Run { config } => run::cmd_run(config),
        Commands::Parse { parser, file, out } => inspect::cmd_parse(parser, file, out),
        Commands::Upload { file, user, store, snapshot } => upload::cmd_upload(file, user, store, snapshot),
        Commands::Show { store, user } => inspect::cmd_show(store, user),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ParseError> for CliError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io { .. } => Self::io(err.to_string()),
            ParseError::MissingHeader(_) | ParseError::MissingColumn(_) => Self::parse(err.to_string())
                .with_hint("is the file the export this parser expects?"),
            _ => Self::parse(err.to_string()),
        }
    }
}

impl From<IngestError> for CliError {
    fn from(err: IngestError) -> Self {
        Self::io(err.to_string())
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => Self::args(err.to_string()),
            ReconError::Store(_) | ReconError::Snapshot { .. } => Self::io(err.to_string()),
        }
    }
}
