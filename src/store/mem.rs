use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde_json::Value;

use super::{DocumentStore, WriteBatch};

/// In-memory store. Keeps every committed batch and the resulting documents.
/// Can be told to fail a number of commits first.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    commits: Vec<WriteBatch>,
    documents: BTreeMap<String, Value>,
    failures_left: usize,
    attempts: usize,
}

impl MemStore {
    pub fn new() -> Self { Self::default() }

    /// A store whose first `n` commit calls fail without applying anything.
    pub fn with_failures(n: usize) -> Self {
        Self { failures_left: n, ..Self::default() }
    }

    /// Successfully committed batches, in order.
    pub fn commits(&self) -> &[WriteBatch] { &self.commits }

    /// Commit calls made, including failed ones.
    pub fn attempts(&self) -> usize { self.attempts }

    /// Current document at "collection/id".
    pub fn document(&self, path: &str) -> Option<&Value> { self.documents.get(path) }

    /// Number of stored documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        let prefix = format!("{collection}/");
        self.documents.keys().filter(|k| k.starts_with(&prefix)).count()
    }
}

impl DocumentStore for MemStore {
    fn commit(&mut self, batch: &WriteBatch) -> Result<()> {
        self.attempts += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            bail!("[MemStore::commit] injected failure ({} left)", self.failures_left);
        }
        for op in batch.ops() {
            self.documents.insert(op.path(), op.data.clone());
        }
        self.commits.push(batch.clone());
        Ok(())
    }
}
