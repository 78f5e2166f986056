//! Persistence collaborator contract and two implementations.
//!
//! Stores are always passed explicitly as `&dyn TransactionStore`. Both
//! implementations keep rows in first-insert order so that a read followed
//! by consolidation sees the same order on every run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use log::debug;
use uuid::Uuid;

use ledgerflow_core::Transaction;

use crate::error::ReconError;
use crate::snapshot::{read_snapshot, write_snapshot};

pub trait TransactionStore: Send + Sync {
    /// Insert or replace by `id`. Upserting the same rows twice is a no-op.
    fn upsert(&self, transactions: &[Transaction]) -> Result<(), ReconError>;

    /// Every stored transaction owned by `user_id`.
    fn read(&self, user_id: Uuid) -> Result<Vec<Transaction>, ReconError>;
}

// ---------------------------------------------------------------------------
// Shared row table
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Rows {
    rows: Vec<Transaction>,
    index: HashMap<String, usize>,
}

impl Rows {
    fn from_vec(rows: Vec<Transaction>) -> Self {
        let mut table = Self::default();
        table.merge(&rows);
        table
    }

    fn merge(&mut self, incoming: &[Transaction]) {
        for tx in incoming {
            match self.index.get(&tx.id) {
                Some(&pos) => self.rows[pos] = tx.clone(),
                None => {
                    self.index.insert(tx.id.clone(), self.rows.len());
                    self.rows.push(tx.clone());
                }
            }
        }
    }

    fn for_user(&self, user_id: Uuid) -> Vec<Transaction> {
        self.rows
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Rows>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|rows| rows.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryStore {
    fn upsert(&self, transactions: &[Transaction]) -> Result<(), ReconError> {
        let mut rows = self
            .inner
            .write()
            .map_err(|_| ReconError::Store("memory store lock poisoned".into()))?;
        rows.merge(transactions);
        Ok(())
    }

    fn read(&self, user_id: Uuid) -> Result<Vec<Transaction>, ReconError> {
        let rows = self
            .inner
            .read()
            .map_err(|_| ReconError::Store("memory store lock poisoned".into()))?;
        Ok(rows.for_user(user_id))
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// A JSON array file holding every user's rows. A missing file is an empty
/// store; it is created on first upsert.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Rows, ReconError> {
        if !self.path.exists() {
            return Ok(Rows::default());
        }
        let rows = read_snapshot(&self.path).map_err(|e| ReconError::Store(e.to_string()))?;
        Ok(Rows::from_vec(rows))
    }
}

impl TransactionStore for JsonFileStore {
    fn upsert(&self, transactions: &[Transaction]) -> Result<(), ReconError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ReconError::Store("file store lock poisoned".into()))?;
        let mut rows = self.load()?;
        rows.merge(transactions);
        write_snapshot(&self.path, &rows.rows).map_err(|e| ReconError::Store(e.to_string()))?;
        debug!("{}: {} rows stored", self.path.display(), rows.rows.len());
        Ok(())
    }

    fn read(&self, user_id: Uuid) -> Result<Vec<Transaction>, ReconError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ReconError::Store("file store lock poisoned".into()))?;
        Ok(self.load()?.for_user(user_id))
    }
}
