//! Batch pipeline configuration (`pipeline.toml`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use ledgerflow_io::ParserKind;
use ledgerflow_recon::{NeutralizeConfig, ReconError, RuleSet};

pub const CONFIG_FILE: &str = "pipeline.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    /// Owner stamped on every transaction. Nil when not set.
    #[serde(default)]
    pub user_id: Uuid,
    /// Where per-source and consolidated snapshots are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Optional JSON store the consolidated set is upserted into.
    #[serde(default)]
    pub store: Option<PathBuf>,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub neutralize: NeutralizeConfig,
    #[serde(default)]
    pub rules: RuleSet,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub dir: PathBuf,
    pub parser: ParserKind,
    /// Defaults to the parser's native extension.
    #[serde(default)]
    pub extension: Option<String>,
    /// Snapshot file stem; sources sharing one are written together.
    /// Defaults to `name`.
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl SourceConfig {
    pub fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .unwrap_or_else(|| self.parser.extension())
    }

    pub fn snapshot_stem(&self) -> &str {
        self.snapshot.as_deref().unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate `path`, then resolve relative paths against
    /// the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ReconError::ConfigParse(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&input)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.sources.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one [[sources]] entry is required".into(),
            ));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ReconError::ConfigValidation("source name must not be empty".into()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
            if source.extension().trim_start_matches('.').trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': extension must not be empty",
                    source.name
                )));
            }
        }

        self.neutralize.validate()
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &Path| if p.is_relative() { base.join(p) } else { p.to_path_buf() };
        self.output_dir = resolve(&self.output_dir);
        self.store = self.store.as_deref().map(resolve);
        for source in &mut self.sources {
            source.dir = resolve(&source.dir);
        }
    }
}

/// `<config dir>/ledgerflow/pipeline.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ledgerflow").join(CONFIG_FILE))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
