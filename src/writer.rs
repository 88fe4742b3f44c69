//! Persistence writer: buffers record writes into bounded batches and commits
//! them one at a time, retrying failed commits with exponential backoff.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::store::{DocumentStore, WriteBatch};

/// How often and how patiently a failed commit is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per batch, including the first.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// One attempt, no retries.
    pub const fn none() -> Self {
        Self { max_attempts: 1, initial_backoff: Duration::ZERO, max_backoff: Duration::ZERO }
    }

    /// Delay after the `attempt`-th failure (1-based): initial * 2^(attempt-1), capped.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, initial_backoff: Duration::from_millis(200), max_backoff: Duration::from_secs(5) }
    }
}

/// Totals after the writer is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub records_written: usize,
    pub batches_committed: usize,
}

/// Batched writer over a [`DocumentStore`]. At most one batch is in flight:
/// a new batch starts only after the previous commit succeeded.
pub struct BatchWriter<S: DocumentStore> {
    store: S,
    limit: usize,
    retry: RetryPolicy,
    pending: WriteBatch,
    summary: WriteSummary,
}

impl<S: DocumentStore> BatchWriter<S> {
    /// `limit` is clamped to at least 1.
    pub fn new(store: S, limit: usize, retry: RetryPolicy) -> Self {
        Self { store, limit: limit.max(1), retry, pending: WriteBatch::new(), summary: WriteSummary::default() }
    }

    /// Queue a full-document write; commits when the batch reaches the limit.
    pub fn set(&mut self, collection: &str, id: &str, data: Value) -> Result<()> {
        self.pending.set(collection, id, data);
        if self.pending.len() >= self.limit {
            self.commit_pending()?;
        }
        Ok(())
    }

    /// Serialize `record` and queue it.
    pub fn set_record<T: Serialize>(&mut self, collection: &str, id: &str, record: &T) -> Result<()> {
        let data = serde_json::to_value(record)
            .map_err(|source| PipelineError::Encode { id: format!("{collection}/{id}"), source })?;
        self.set(collection, id, data)
    }

    /// Commit the partial last batch, if any, and report totals.
    pub fn finish(mut self) -> Result<WriteSummary> {
        if !self.pending.is_empty() {
            self.commit_pending()?;
        }
        info!(records = self.summary.records_written, batches = self.summary.batches_committed, "writes committed");
        Ok(self.summary)
    }

    pub fn summary(&self) -> WriteSummary { self.summary }

    fn commit_pending(&mut self) -> Result<()> {
        let batch = self.summary.batches_committed;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.store.commit(&self.pending) {
                Ok(()) => break,
                Err(e) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay(attempt);
                    warn!(batch, attempt, delay_ms = delay.as_millis() as u64, error = %format!("{e:#}"), "batch commit failed, retrying");
                    std::thread::sleep(delay);
                }
                Err(e) => {
                    return Err(PipelineError::PersistenceFailure { batch, attempts: attempt, source: e.into() });
                }
            }
        }

        debug!(batch, writes = self.pending.len(), attempts = attempt, "committed batch");
        self.summary.records_written += self.pending.len();
        self.summary.batches_committed += 1;
        self.pending = WriteBatch::new();
        Ok(())
    }
}
