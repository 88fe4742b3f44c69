pub mod inspect;
pub mod seed;

use std::path::Path;

use anyhow::{Context, Result};
use wardseed::{PipelineConfig, PipelineInputs, RunReport};

use crate::cli::SourceArgs;

/// Config file (or defaults) with command-line overrides applied.
pub(crate) fn load_config(args: &SourceArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.overlap_threshold = threshold;
    }
    if let Some(metric) = args.metric {
        config.area_metric = metric.into();
    }
    Ok(config)
}

pub(crate) fn inputs(args: &SourceArgs) -> PipelineInputs {
    PipelineInputs::new(&args.constituencies, &args.wards)
}

/// Print the report and optionally save it as JSON.
pub(crate) fn emit_report(report: &RunReport, path: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(report).context("[emit_report] encode report")?;
    println!("{text}");
    if let Some(path) = path {
        std::fs::write(path, &text)
            .with_context(|| format!("[emit_report] write {}", path.display()))?;
    }
    Ok(())
}
