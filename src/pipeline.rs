//! Loader → Merger → Matcher → Writer, run strictly in sequence.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, info_span};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::load::{load_fragments, load_wards, require_inputs};
use crate::matcher::match_wards;
use crate::merge::merge_constituencies;
use crate::records::{ConstituencyRecord, WardRecord};
use crate::store::DocumentStore;
use crate::types::{Constituencies, ResolvedWard};
use crate::writer::{BatchWriter, WriteSummary};

/// The two source documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineInputs {
    /// Constituency fragment feature collection.
    pub constituencies: PathBuf,
    /// Ward feature collection (or bare array of features).
    pub wards: PathBuf,
}

impl PipelineInputs {
    pub fn new(constituencies: impl Into<PathBuf>, wards: impl Into<PathBuf>) -> Self {
        Self { constituencies: constituencies.into(), wards: wards.into() }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub fragments_loaded: usize,
    pub fragments_skipped: usize,
    pub wards_loaded: usize,
    pub wards_skipped: usize,
    pub constituencies: usize,
    pub union_fallbacks: usize,
    pub wards_matched: usize,
    pub wards_unmatched: usize,
    pub skipped_pairs: usize,
    pub records_written: usize,
    pub batches_committed: usize,
}

/// Everything computed before the writer runs.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub constituencies: Constituencies,
    pub wards: Vec<ResolvedWard>,
    pub report: RunReport,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validates the configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig { &self.config }

    /// Load, merge and match; no writes.
    pub fn prepare(&self, inputs: &PipelineInputs) -> Result<Prepared> {
        require_inputs([inputs.constituencies.as_path(), inputs.wards.as_path()])?;
        let schema = &self.config.schema;
        let mut report = RunReport::default();

        let (fragments, wards) = {
            let _span = info_span!("load").entered();
            let fragments = load_fragments(&inputs.constituencies, schema)?;
            let wards = load_wards(&inputs.wards, schema)?;
            (fragments, wards)
        };
        report.fragments_loaded = fragments.items.len();
        report.fragments_skipped = fragments.skipped;
        report.wards_loaded = wards.items.len();
        report.wards_skipped = wards.skipped;

        let merged = {
            let _span = info_span!("merge").entered();
            merge_constituencies(fragments.items, &self.config.merge_options())
        };
        report.constituencies = merged.constituencies.len();
        report.union_fallbacks = merged.union_fallbacks;

        let matched = {
            let _span = info_span!("match").entered();
            match_wards(wards.items, &merged.constituencies, &self.config.match_options())
        };
        report.wards_matched = matched.matched;
        report.wards_unmatched = matched.unmatched;
        report.skipped_pairs = matched.skipped_pairs;

        Ok(Prepared { constituencies: merged.constituencies, wards: matched.wards, report })
    }

    /// Write constituencies, then wards, in batches.
    pub fn write<S: DocumentStore>(&self, prepared: &Prepared, store: S) -> Result<WriteSummary> {
        let _span = info_span!("write").entered();
        let collections = &self.config.collections;
        let mut writer = BatchWriter::new(store, self.config.batch_limit, self.config.retry.policy());

        for c in &prepared.constituencies {
            let record = ConstituencyRecord::from_merged(c).map_err(|source| encode_error(&collections.constituencies, &c.id, source))?;
            writer.set_record(&collections.constituencies, &c.id, &record)?;
        }
        for w in &prepared.wards {
            let record = WardRecord::from_resolved(w).map_err(|source| encode_error(&collections.wards, &w.id, source))?;
            writer.set_record(&collections.wards, &w.id, &record)?;
        }
        writer.finish()
    }

    /// Full run: prepare, then write everything to `store`.
    pub fn run<S: DocumentStore>(&self, inputs: &PipelineInputs, store: S) -> Result<RunReport> {
        let prepared = self.prepare(inputs)?;
        let summary = self.write(&prepared, store)?;
        let report = RunReport {
            records_written: summary.records_written,
            batches_committed: summary.batches_committed,
            ..prepared.report
        };
        info!(?report, "seeding complete");
        Ok(report)
    }

    /// Every stage but the writer.
    pub fn run_dry(&self, inputs: &PipelineInputs) -> Result<RunReport> {
        let report = self.prepare(inputs)?.report;
        info!(?report, "dry run complete, nothing written");
        Ok(report)
    }
}

fn encode_error(collection: &str, id: &str, source: serde_json::Error) -> PipelineError {
    PipelineError::Encode { id: format!("{collection}/{id}"), source }
}
